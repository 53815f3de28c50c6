use anyhow::{anyhow, Result};
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use highlight_cards::config::{Config, RecentKeywords, RECENT_FALLBACK_COUNT};
use highlight_cards::summary::{create_summarizer, summarize_segments};
use highlight_cards::{
    load_transcript, CardDeck, ExtractiveSummarizer, KeywordSet, SegmentSelector, ThumbnailCache,
    TranscriptFormat, VideoRef,
};

fn cli() -> Command {
    Command::new("Highlight Cards")
        .version("0.1.0")
        .author("TigreRoll")
        .about("Pick highlight segments from a video transcript and build summary cards")
        .arg(
            Arg::new("transcript")
                .value_name("FILE")
                .help("Transcript file (.vtt, .srt or .txt)")
                .required(true),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Transcript format: vtt, srt or text (default: from extension)"),
        )
        .arg(
            Arg::new("keywords")
                .short('k')
                .long("keywords")
                .value_name("LIST")
                .help("Comma separated keywords, e.g. \"intro,results\""),
        )
        .arg(
            Arg::new("auto-keywords")
                .long("auto-keywords")
                .help("Add keywords detected from the transcript")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("cards")
                .short('n')
                .long("cards")
                .value_name("NUM")
                .help("Number of highlight cards"),
        )
        .arg(
            Arg::new("context-window")
                .short('w')
                .long("context-window")
                .value_name("CUES")
                .help("Cues of context on each side of a keyword match"),
        )
        .arg(
            Arg::new("video-url")
                .short('u')
                .long("video-url")
                .value_name("URL")
                .help("YouTube URL used for seek links and thumbnails"),
        )
        .arg(
            Arg::new("title")
                .short('t')
                .long("title")
                .value_name("TITLE")
                .help("Deck title (default: transcript file name)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output JSON file for the card deck"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file"),
        )
        .arg(
            Arg::new("no-llm")
                .long("no-llm")
                .help("Use extractive summaries only")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue),
        )
}

fn init_logging(verbose: bool, level: &str) {
    let default_filter = if verbose {
        "highlight_cards=debug,warn".to_string()
    } else {
        format!("highlight_cards={},warn", level)
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    let verbose = matches.get_flag("verbose");

    // A named config file must load; a discovered one may fall back to defaults
    let (mut config, load_error) = match matches.get_one::<String>("config") {
        Some(path) => (Config::load_with_env(path)?, None),
        None => match Config::load() {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        },
    };

    init_logging(verbose, &config.output.log_level);
    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    // Command line overrides
    if let Some(keywords) = matches.get_one::<String>("keywords") {
        config.selection.keywords = KeywordSet::parse_list(keywords).iter().map(str::to_string).collect();
    }
    if matches.get_flag("auto-keywords") {
        config.selection.auto_keywords = true;
    }
    if let Some(cards) = matches.get_one::<String>("cards") {
        config.selection.target_count = cards.parse()?;
    }
    if let Some(window) = matches.get_one::<String>("context-window") {
        config.selection.context_window = window.parse()?;
    }
    if matches.get_flag("no-llm") {
        config.summary.enable_llm = false;
    }
    config.validate()?;

    let transcript_path = PathBuf::from(
        matches
            .get_one::<String>("transcript")
            .ok_or_else(|| anyhow!("Transcript path is required"))?,
    );
    let format = matches
        .get_one::<String>("format")
        .map(|f| f.parse::<TranscriptFormat>())
        .transpose()?;
    let video = matches
        .get_one::<String>("video-url")
        .map(|url| VideoRef::parse(url))
        .transpose()?;
    let title = matches.get_one::<String>("title").cloned().unwrap_or_else(|| {
        transcript_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Highlights".to_string())
    });
    let output = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.output.base_dir.join(&config.output.cards_file));

    info!("🚀 Highlight Cards starting...");
    debug!("{}", config.summary());
    info!("📄 Transcript: {}", transcript_path.display());
    info!("📂 Output: {}", output.display());

    let start_time = std::time::Instant::now();
    let cues = load_transcript(&transcript_path, format).await?;

    let mut recent = match &config.output.recent_keywords_file {
        Some(path) => RecentKeywords::load(path).await,
        None => RecentKeywords::default(),
    };
    if !recent.is_empty() {
        info!("🕘 Recent keywords: {}", recent.recent(RECENT_FALLBACK_COUNT).join(", "));
    }

    let mut keywords = config.selection.resolve_keywords(&recent);
    if config.selection.keywords.is_empty() && !keywords.is_empty() {
        info!("♻️ No keywords given, reusing recent keywords");
    }
    if config.selection.auto_keywords {
        let detected = KeywordSet::detect(&cues, config.selection.auto_keyword_limit.max(1));
        info!("🔎 Detected keywords: {}", detected.iter().collect::<Vec<_>>().join(", "));
        keywords.extend(detected.iter().map(str::to_string));
    }
    let keywords = KeywordSet::new(&keywords);

    let selector = SegmentSelector::new(keywords, config.selection.params());
    let segments = selector.select(&cues);
    if segments.is_empty() {
        warn!("No highlights found in {}", transcript_path.display());
        println!("No highlights found.");
        return Ok(());
    }
    info!("🎯 Selected {} highlight segments", segments.len());

    let summarizer = create_summarizer(&config.summary, &config.llm).await;
    let fallback = ExtractiveSummarizer::new(config.summary.max_chars);
    let summaries = summarize_segments(
        summarizer.as_ref(),
        &fallback,
        &segments,
        config.summary.max_concurrent,
    )
    .await;

    let deck = CardDeck::build(title, video, &segments, summaries, &ThumbnailCache::new());
    deck.save_json(&output).await?;

    if let Some(path) = &config.output.recent_keywords_file {
        let used: Vec<&str> = selector.keywords().iter().collect();
        recent.record(&used);
        if let Err(e) = recent.save(path).await {
            warn!("Failed to save recent keywords: {}", e);
        }
    }

    for card in &deck.cards {
        println!("{:>2}. [{}] {} - {}", card.index, card.timestamp, card.keyword, card.summary);
    }

    info!("🎉 Built {} cards in {:.2}s", deck.cards.len(), start_time.elapsed().as_secs_f64());
    Ok(())
}
