use lqlnorm::{BoundDetails, NormalizeResultVerbose, TimeSource, format_canonical};

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

pub fn print_run(blob: &str, res: &NormalizeResultVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    let details = &res.details;
    let preview: String = blob.chars().take(60).collect();
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Normalizing: \"{}\"", preview), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Query ━━━", ansi::GRAY));
    println!("  {} {}", palette.dim("blob:"), palette.paint(details.blob.name(), ansi::BLUE));
    println!(
        "  {} {}",
        palette.dim("mode:"),
        palette.paint(if details.policy.allow_empty_bounds { "definition" } else { "execution" }, ansi::BLUE)
    );

    println!("\n{}", palette.paint("━━━ Window ━━━", ansi::GRAY));
    print_bound("start", &details.start, &format_canonical(res.query.window.start), &palette);
    print_bound("end", &details.end, &format_canonical(res.query.window.end), &palette);

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Translate: {}  │  Resolve: {}  │  Range: {}",
        palette.paint(format!("{:?}", details.metrics.total), ansi::GREEN),
        palette.dim(format!("{:?}", details.metrics.translate)),
        palette.paint(format!("{:?}", details.metrics.resolve), ansi::CYAN),
        palette.dim(format!("{:?}", details.metrics.range)),
    );
    println!();
}

fn print_bound(label: &str, bound: &BoundDetails, value: &str, palette: &ansi::Palette) {
    let origin = if bound.defaulted {
        palette.paint("defaulted", ansi::YELLOW)
    } else {
        palette.paint(bound.source.name(), ansi::BLUE)
    };
    println!(
        "  {} {} {} {}",
        palette.paint(format!("{label:>5}:"), ansi::GRAY),
        palette.bold(palette.paint(value, ansi::GREEN)),
        palette.dim("│"),
        origin
    );

    if bound.source != TimeSource::Empty {
        println!("         {} {}", palette.dim("from:"), palette.dim(format!("{:?}", bound.raw)));
    }
}
