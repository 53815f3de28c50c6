use highlight_cards::summary::summarize_segments;
use highlight_cards::transcript::parse_timestamp;
use highlight_cards::{
    load_transcript, parse, select, CardDeck, Cue, ExtractiveSummarizer, KeywordSet, SegmentSelector,
    SelectionParams, ThumbnailCache, TranscriptFormat, VideoRef,
};
use tempfile::TempDir;
use tokio::fs;

fn vtt_block(start: &str, end: &str, text: &str) -> String {
    format!("{} --> {}\n{}\n\n", start, end, text)
}

/// One 5 second cue every 10 seconds, with `texts` placed at the given seconds
fn timeline(last_second: u32, texts: &[(u32, &str)]) -> Vec<Cue> {
    (0..=last_second / 10)
        .map(|i| {
            let second = i * 10;
            let text = texts
                .iter()
                .find(|(at, _)| *at == second)
                .map(|(_, text)| text.to_string())
                .unwrap_or_else(|| format!("filler line {}", i));
            Cue::new(second as f64, second as f64 + 5.0, text)
        })
        .collect()
}

#[test]
fn test_well_formed_vtt_blocks_parse_in_order() {
    let mut raw = String::from("WEBVTT\n\n");
    for i in 0..5 {
        raw.push_str(&vtt_block(
            &format!("00:00:{:02}.000", i * 10),
            &format!("00:00:{:02}.500", i * 10 + 5),
            &format!("cue number {}", i),
        ));
    }

    let cues = parse(&raw, TranscriptFormat::Vtt);
    assert_eq!(cues.len(), 5);
    for (i, cue) in cues.iter().enumerate() {
        assert_eq!(cue.text, format!("cue number {}", i));
        assert_eq!(cue.start, i as f64 * 10.0);
        assert_eq!(cue.end, i as f64 * 10.0 + 5.5);
    }
}

#[test]
fn test_one_malformed_block_is_skipped() {
    let raw = format!(
        "WEBVTT\n\n{}{}{}",
        vtt_block("00:00:01.000", "00:00:02.000", "first"),
        vtt_block("00:00:xx.000", "00:00:04.000", "broken"),
        vtt_block("00:00:05.000", "00:00:06.000", "third"),
    );

    let cues = parse(&raw, TranscriptFormat::Vtt);
    let texts: Vec<&str> = cues.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "third"]);
}

#[test]
fn test_timestamp_examples() {
    assert_eq!(parse_timestamp("00:01:30.000").unwrap(), 90.0);
    assert_eq!(parse_timestamp("1:02:03.500").unwrap(), 3723.5);
    assert_eq!(parse_timestamp("02:30,000").unwrap(), 150.0);
}

#[test]
fn test_segments_never_overlap_and_respect_target() {
    let cues = timeline(
        300,
        &[
            (30, "a key point"),
            (40, "another key point"),
            (150, "key takeaway"),
            (290, "final key idea"),
        ],
    );

    for target in 1..=8 {
        for window in 0..=3 {
            let segments = select(&cues, &["key", "idea"], target, window);
            assert!(segments.len() <= target);
            for pair in segments.windows(2) {
                assert!(pair[0].end <= pair[1].start, "target {} window {}", target, window);
            }
        }
    }

    assert!(select(&[], &["key"], 3, 1).is_empty());
}

#[test]
fn test_equal_scores_keep_transcript_order() {
    let cues = timeline(100, &[(20, "tip one"), (30, "tip two")]);

    let segments = select(&cues, &["tip"], 1, 1);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].start, 10.0);
    assert!(segments[0].text.contains("tip one"));
    assert_eq!(segments[0].keyword, "tip");
}

#[test]
fn test_backfill_without_matches() {
    let cues = timeline(290, &[]);
    assert_eq!(cues.len(), 30);

    let segments = select(&cues, &["nothing matches"], 3, 2);
    assert_eq!(segments.len(), 3);

    let starts: Vec<f64> = segments.iter().map(|s| s.start).collect();
    let ends: Vec<f64> = segments.iter().map(|s| s.end).collect();
    assert_eq!(starts, vec![0.0, 100.0, 200.0]);
    assert_eq!(ends, vec![95.0, 195.0, 295.0]);
    for segment in &segments {
        assert_eq!(segment.keyword, "general");
        assert_eq!(segment.score, 0);
        assert_eq!(segment.last_cue - segment.first_cue + 1, 10);
    }
}

#[test]
fn test_keyword_regions_scenario() {
    let cues = timeline(
        210,
        &[
            (0, "introduction to the topic"),
            (10, "more introduction"),
            (20, "introduction wraps up"),
            (100, "here are the results"),
            (110, "results continued"),
            (200, "in conclusion"),
        ],
    );

    let selector = SegmentSelector::new(
        KeywordSet::new(&["Introduction", "results", "conclusion"]),
        SelectionParams {
            target_count: 3,
            context_window: 1,
        },
    );
    let segments = selector.select(&cues);

    let keywords: Vec<&str> = segments.iter().map(|s| s.keyword.as_str()).collect();
    assert_eq!(keywords, vec!["introduction", "results", "conclusion"]);
    assert!(segments.iter().all(|s| s.score == 1));
    assert_eq!(segments[0].start, 0.0);
    assert_eq!(segments[1].start, 90.0);
    assert_eq!(segments[2].start, 190.0);
    for pair in segments.windows(2) {
        assert!(pair[0].end <= pair[1].start);
    }
}

#[tokio::test]
async fn test_srt_file_to_card_deck() {
    let temp_dir = TempDir::new().unwrap();
    let transcript = temp_dir.path().join("talk.srt");
    let output = temp_dir.path().join("cards").join("talk.json");

    let srt = "1\n00:00:00,000 --> 00:00:04,000\nWelcome to the introduction of this talk.\n\n\
               2\n00:00:04,000 --> 00:00:09,000\nWe cover parsing first.\n\n\
               3\n00:00:09,000 --> 00:00:15,000\nThe results are a lot faster than before.\n\n\
               4\n00:00:15,000 --> 00:00:20,000\nThanks for watching.\n";
    fs::write(&transcript, srt).await.unwrap();

    let cues = load_transcript(&transcript, None).await.unwrap();
    assert_eq!(cues.len(), 4);

    let segments = select(&cues, &["introduction", "results"], 2, 0);
    assert_eq!(segments.len(), 2);

    let summarizer = ExtractiveSummarizer::default();
    let summaries = summarize_segments(&summarizer, &summarizer, &segments, 2).await;
    assert_eq!(summaries.len(), 2);

    let video = VideoRef::parse("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
    let deck = CardDeck::build("Talk", Some(video), &segments, summaries, &ThumbnailCache::new());
    deck.save_json(&output).await.unwrap();

    let loaded = CardDeck::load_json(&output).await.unwrap();
    assert_eq!(loaded.cards.len(), 2);
    assert_eq!(loaded.cards[1].timestamp, "00:09");
    assert_eq!(
        loaded.cards[1].seek_url.as_deref(),
        Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=9s")
    );
}

#[tokio::test]
async fn test_plain_text_transcript_is_converted() {
    let temp_dir = TempDir::new().unwrap();
    let transcript = temp_dir.path().join("notes.txt");
    fs::write(&transcript, "0:00 Hello and welcome\n1:30 The main point\n2:45 Goodbye")
        .await
        .unwrap();

    let cues = load_transcript(&transcript, None).await.unwrap();
    let starts: Vec<f64> = cues.iter().map(|c| c.start).collect();
    assert_eq!(starts, vec![0.0, 90.0, 165.0]);
    assert_eq!(cues[1].text, "The main point");
    assert_eq!(cues[2].end, 170.0);

    assert!(load_transcript(temp_dir.path().join("missing.vtt"), None).await.is_err());
}
