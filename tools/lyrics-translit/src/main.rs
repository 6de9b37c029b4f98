use std::fs::File;
use std::io::{self, BufWriter, Read, Write};

use clap::{Arg, ArgAction, Command};

use lyrics_translit_rs::mapping::{JsonFileMappingStore, MemoryMappingStore};
use lyrics_translit_rs::{Language, Mode, SegmentedOptions, Transliterator};
use lyrics_translit_rs::analyzer::MecabAnalyzer;
use lyrics_translit_rs::mapping::FuriganaMappingStore;
use lyrics_translit_rs::segmenter::PassthroughSegmenter;

const MODE_LIST: [&str; 3] = ["plain", "karaoke", "typing"];
const LANGUAGE_LIST: [&str; 3] = ["ja", "zh", "en"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    const BLUE: &str = "\x1B[1;34m";
    const RESET: &str = "\x1B[0m";
    let matches = Command::new("Lyrics Translit")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("file")
                .help("Read lyrics text from <file>."),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("file")
                .help("Write annotated output to <file>."),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("mode")
                .default_value("plain")
                .help("Segmentation mode: [plain|karaoke|typing]"),
        )
        .arg(
            Arg::new("language")
                .short('l')
                .long("language")
                .value_name("language")
                .help("Force a language instead of detecting: [ja|zh|en]"),
        )
        .arg(
            Arg::new("mappings")
                .long("mappings")
                .value_name("file")
                .help("JSON file holding furigana correction rows."),
        )
        .arg(
            Arg::new("segmented")
                .short('s')
                .long("segmented")
                .action(ArgAction::SetTrue)
                .help("Emit the segmented document as JSON instead of plain readings."),
        )
        .about(format!(
            "{}Lyrics Translit: Command Line Lyrics Transliterator{}",
            BLUE, RESET
        ))
        .get_matches();

    let input_file = matches.get_one::<String>("input");
    let output_file = matches.get_one::<String>("output");
    let mode_name = matches.get_one::<String>("mode").map(String::as_str);
    let mode = match mode_name {
        Some("plain") | None => Mode::Plain,
        Some("karaoke") => Mode::Karaoke,
        Some("typing") => Mode::Typing,
        Some(other) => {
            println!("Invalid mode: {}", other);
            println!("Valid modes are: {:?}", MODE_LIST);
            return Ok(());
        }
    };
    let language = match matches.get_one::<String>("language").map(String::as_str) {
        None => None,
        Some("ja") => Some(Language::Ja),
        Some("zh") => Some(Language::Zh),
        Some("en") => Some(Language::En),
        Some(other) => {
            println!("Invalid language: {}", other);
            println!("Valid languages are: {:?}", LANGUAGE_LIST);
            return Ok(());
        }
    };
    let segmented = matches.get_flag("segmented");

    let mut input: String = String::new();
    match input_file {
        Some(path) => {
            File::open(path)?.read_to_string(&mut input)?;
        }
        None => {
            io::stdin().read_to_string(&mut input)?;
            eprintln!("{}Lyrics Translit: Command Line Lyrics Transliterator{}", BLUE, RESET);
        }
    }
    // Text files commonly end with a newline the caller does not mean as an
    // empty last line.
    if input.ends_with('\n') {
        input.pop();
        if input.ends_with('\r') {
            input.pop();
        }
    }

    let store: Box<dyn FuriganaMappingStore> = match matches.get_one::<String>("mappings") {
        Some(path) => Box::new(JsonFileMappingStore::open(path)?),
        None => Box::new(MemoryMappingStore::new()),
    };
    let engine = Transliterator::with_components(
        Box::new(MecabAnalyzer::new()),
        Box::new(PassthroughSegmenter),
        store,
    );

    let output: String = if segmented {
        let options = SegmentedOptions {
            language,
            mode,
            furigana: None,
        };
        let document = engine.segmented_transliteration(&input, &options)?;
        serde_json::to_string_pretty(&document)?
    } else {
        engine.transliterate(&input, language)?
    };

    let mut writer: Box<dyn Write> = match output_file {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };
    writeln!(writer, "{}", output)?;
    writer.flush()?;

    if let (Some(input_path), Some(output_path)) = (input_file, output_file) {
        eprintln!(
            "Transliteration completed ({} -> {}): {}",
            input_path,
            output_path,
            mode_name.unwrap_or("plain")
        );
    }

    Ok(())
}
