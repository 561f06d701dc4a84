use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use resume_pdf::{
    Error, FontLoader, FontSource, LayoutMode,
    resume::{RankedItems, Resume, master_preview_tree, tailored_preview_tree},
};

/// Render a stored resume JSON document to PDF.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Resume JSON file.
    input: PathBuf,

    /// Output PDF path.
    #[arg(short, long, default_value = "resume.pdf")]
    output: PathBuf,

    /// Compress onto a single page with the dense type scale.
    #[arg(long)]
    dense: bool,

    /// Ranked-items JSON; swaps in the job-tailored experience and
    /// project selections.
    #[arg(long)]
    ranked: Option<PathBuf>,

    /// Regular TrueType font file. Requires --font-bold.
    #[arg(long, requires = "font_bold")]
    font_regular: Option<PathBuf>,

    /// Bold TrueType font file. Requires --font-regular.
    #[arg(long, requires = "font_regular")]
    font_bold: Option<PathBuf>,
}

fn run(args: Args) -> Result<(), Error> {
    let json = std::fs::read_to_string(&args.input)?;
    let resume: Resume =
        serde_json::from_str(&json).map_err(|e| Error::InvalidResume(e.to_string()))?;

    let tree = match &args.ranked {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let ranked: RankedItems =
                serde_json::from_str(&json).map_err(|e| Error::InvalidResume(e.to_string()))?;
            tailored_preview_tree(&resume, &ranked)
        }
        None => master_preview_tree(&resume),
    };

    let mode = if args.dense {
        LayoutMode::dense()
    } else {
        LayoutMode::standard()
    };

    let source = match (args.font_regular, args.font_bold) {
        (Some(regular), Some(bold)) => FontSource::Files { regular, bold },
        _ => FontSource::Builtin,
    };

    let doc = resume_pdf::render_with_fonts(&tree, &mode, FontLoader::shared(), &source)?;
    if doc.overflowed {
        eprintln!("warning: content did not fit on one page; the overflow was dropped");
    }
    doc.save(&args.output)?;
    println!(
        "Wrote {} ({} page(s), {} bytes)",
        args.output.display(),
        doc.page_count,
        doc.bytes.len(),
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
