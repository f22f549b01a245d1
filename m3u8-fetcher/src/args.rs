use clap::{ArgAction, ColorChoice, Parser};

/// Capture the .m3u8 playlist url requested by a website.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
#[clap(long_about = "Capture the .m3u8 playlist url requested by a website.\n\n\
Requires any one of these browser to be installed:\n\
1. chrome - https://www.google.com/chrome\n\
2. chromium - https://www.chromium.org/getting-involved/download-chromium\n\n\
Opens the page in a headless browser and watches outgoing requests. \
The first matching playlist url is written to /tmp/m3u8.txt and the program exits. \
If nothing matches before the network goes idle, the exit status is 1.")]
pub struct Args {
    /// http(s)://
    #[arg(required = true)]
    pub url: String,

    /// When to output colored text.
    #[arg(long, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Print debug logs, repeat for trace logs.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Exit status for a failed argument parse.
///
/// Usage errors exit with 1 rather than clap's 2, `--help` and `--version`
/// still exit with 0.
pub fn usage_exit_code(e: &clap::Error) -> i32 {
    if e.use_stderr() { 1 } else { 0 }
}
