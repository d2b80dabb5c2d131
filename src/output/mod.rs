//! Styled terminal output for the scaffolding CLI.
//!
//! Prompts are rendered by inquire; everything else the operator sees goes
//! through these helpers. Errors go to stderr, the rest to stdout.

use owo_colors::OwoColorize;

const MINT: (u8, u8, u8) = (152, 225, 152);
const CORAL: (u8, u8, u8) = (255, 160, 160);
const CREAM: (u8, u8, u8) = (255, 230, 160);
const SKY: (u8, u8, u8) = (160, 200, 255);
const LAVENDER: (u8, u8, u8) = (181, 174, 254);
const GREY: (u8, u8, u8) = (160, 160, 160);

const RULE_WIDTH: usize = 50;

fn marked(symbol: &str, (r, g, b): (u8, u8, u8), message: &str) -> String {
    format!("{} {}", symbol.truecolor(r, g, b).bold(), message.bright_white())
}

fn rule() -> String {
    let (r, g, b) = GREY;
    "─".repeat(RULE_WIDTH).truecolor(r, g, b).to_string()
}

pub fn success(message: &str) {
    println!("{}", marked("✓", MINT, message));
}

pub fn error(message: &str) {
    eprintln!("{}", marked("✗", CORAL, message));
}

/// Used for rejected answers before the question is asked again
pub fn warning(message: &str) {
    println!("{}", marked("⚠", CREAM, message));
}

pub fn info(message: &str) {
    println!("{}", marked("ℹ", SKY, message));
}

/// Domain heading in the resolved-values summary
pub fn section(title: &str) {
    let (r, g, b) = LAVENDER;
    println!("\n{}", title.truecolor(r, g, b).bold());
    println!("{}", rule());
}

/// One `name: value (origin)` row of the summary
pub fn key_value(key: &str, value: &str) {
    let (r, g, b) = GREY;
    println!("  {} {}", format!("{}:", key).truecolor(r, g, b), value.bright_white());
}

pub fn dimmed(message: &str) {
    let (r, g, b) = GREY;
    println!("{}", message.truecolor(r, g, b));
}

/// Generator title with the tool version, e.g. "AWS Lambda Generator v0.1.0"
pub fn banner(title: &str, version: &str) {
    let (r, g, b) = LAVENDER;
    let (vr, vg, vb) = CORAL;
    println!();
    println!(
        "{} {}",
        title.truecolor(r, g, b).bold(),
        format!("v{}", version).truecolor(vr, vg, vb)
    );
    println!("{}", rule());
}
