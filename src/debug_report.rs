use traduko::{SentenceTrace, TranslationVerbose, WordInventory};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(out: &TranslationVerbose, color: bool) {
    let palette = ansi::Palette::new(color);

    for trace in &out.details.sentences {
        print_sentence(trace, &palette);
    }

    println!("\n{}", palette.paint("━━━ Batch ━━━", ansi::GRAY));
    println!(
        "  Sentences: {}  │  Ambiguous: {}  │  Total: {}",
        palette.paint(out.translation.sentences.len().to_string(), ansi::BLUE),
        palette.paint(out.translation.ambiguities.len().to_string(), ansi::YELLOW),
        palette.paint(format!("{:?}", out.details.total), ansi::GREEN),
    );
    println!();
}

fn print_sentence(trace: &SentenceTrace, palette: &ansi::Palette) {
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Translating: \"{}\"", trace.sentence), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Candidates ━━━", ansi::GRAY));
    println!(
        "  {} parse(s), {} rewrite pass(es)",
        palette.paint(trace.parses.to_string(), ansi::BLUE),
        palette.paint(trace.passes.to_string(), ansi::BLUE),
    );
    for (idx, candidate) in trace.candidates.entries().iter().enumerate() {
        let marker = if candidate.rendered == trace.chosen { "▸" } else { " " };
        println!(
            "  {} {} {} {}",
            palette.paint(format!("[{idx}]{marker}"), ansi::GRAY),
            palette.bold(palette.paint(&candidate.rendered, ansi::GREEN)),
            palette.dim("│"),
            palette.paint(format!("{} substitution(s)", candidate.substitutions), ansi::YELLOW),
        );
    }

    if !trace.warnings.is_empty() {
        println!(
            "  {} {}",
            palette.paint("warnings:", ansi::YELLOW),
            palette.paint(format!("{:?}", trace.warnings), ansi::YELLOW)
        );
    }

    println!(
        "  {} parse {} │ rewrite {} │ render {}",
        palette.dim("timing:"),
        palette.dim(format!("{:?}", trace.metrics.parse)),
        palette.dim(format!("{:?}", trace.metrics.rewrite)),
        palette.dim(format!("{:?}", trace.metrics.render)),
    );
}

pub fn print_inventory(inventory: &WordInventory, color: bool) {
    let palette = ansi::Palette::new(color);

    println!("\n{}", palette.paint("━━━ Tag inventory ━━━", ansi::GRAY));
    if inventory.tag_words.is_empty() {
        println!("{}", palette.dim("  No tagged words collected"));
    }
    for (tag, words) in &inventory.tag_words {
        let list: Vec<&str> = words.iter().map(String::as_str).collect();
        println!(
            "  {} {}",
            palette.paint(format!("{tag}:"), ansi::BLUE),
            palette.paint(list.join(" "), ansi::GREEN),
        );
    }

    if !inventory.ambiguous.is_empty() {
        println!("\n{}", palette.paint("━━━ Ambiguous sentences ━━━", ansi::GRAY));
        for case in &inventory.ambiguous {
            println!(
                "  {} {}",
                palette.paint(format!("\"{}\"", case.sentence), ansi::CYAN),
                palette.dim(format!("({} parses)", case.trees.len())),
            );
            for tree in &case.trees {
                println!("    {}", palette.dim(tree.to_string()));
            }
        }
    }

    if !inventory.failed.is_empty() {
        println!("\n{}", palette.paint("━━━ Failed sentences ━━━", ansi::GRAY));
        for sentence in &inventory.failed {
            println!("  {}", palette.paint(sentence, ansi::YELLOW));
        }
    }

    println!(
        "\n  {} tag(s), {} failed, {} ambiguous\n",
        inventory.tag_words.len(),
        inventory.failed.len(),
        inventory.ambiguous.len(),
    );
}
