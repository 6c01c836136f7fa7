use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "fraxplore",
    author,
    version,
    about = "Interactive Mandelbrot/Julia explorer",
    long_about = "Interactive Mandelbrot/Julia explorer.\n\n\
        Keys: Escape quits, 2-8 select the power, M shows the Mandelbrot set, \
        J shows the Julia set."
)]
pub struct Cli {
    /// Image composited over the fractal wherever its red channel exceeds 0.1.
    #[arg(long, value_name = "PATH", default_value = "name.png")]
    pub overlay: PathBuf,
}

pub fn parse() -> Cli {
    Cli::parse()
}
