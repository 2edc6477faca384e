use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use visitor_report_pdf::builder::ReportBuilder;
use visitor_report_pdf::config::{AssetPaths, Labels};
use visitor_report_pdf::fonts;
use visitor_report_pdf::model::{ReportPage, ReportRequest};

/// Builds a visitor-statistics PDF from chart screenshots.
///
/// Fonts are looked up in `VISITOR_REPORT_FONTS_DIR`, then `assets/fonts` next to the
/// executable, then `assets/fonts` next to the library crate, unless `--fonts-dir` is
/// given.  Set `RUST_LOG=debug` to follow the build page by page.
#[derive(Parser)]
#[command(author, version, about = "Compose a visitor statistics report PDF")]
struct Cli {
    /// Title centred in the header of every body page.
    #[arg(long, default_value = "Visitor statistics")]
    title: String,

    /// Report identifier shown on the cover and after the header date label.
    #[arg(long = "date-label")]
    date_label: String,

    /// Total number of visitors printed in the footer.
    #[arg(long, default_value_t = 0)]
    visitors: u64,

    /// Output PDF path.
    #[arg(short, long, default_value = "report.pdf")]
    output: PathBuf,

    /// Directory holding cover.jpg and logo.png.
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// Directory holding the regular and bold font files.
    #[arg(long)]
    fonts_dir: Option<PathBuf>,

    /// Header label preceding the report identifier.
    #[arg(long, default_value = "Date:")]
    date_prefix: String,

    /// Footer label preceding the visitor total.
    #[arg(long, default_value = "Total visitors:")]
    visitors_prefix: String,

    /// Add an outline entry for every titled page.
    #[cfg(feature = "bookmarks")]
    #[arg(long)]
    bookmarks: bool,

    /// Page images in output order, as `path` or `Title=path`.
    #[arg(value_name = "PAGE")]
    pages: Vec<String>,
}

fn parse_page(argument: &str) -> ReportPage {
    // A path containing `=` that exists on disk wins over the `Title=path` form.
    if PathBuf::from(argument).is_file() {
        return ReportPage::new(argument);
    }
    match argument.split_once('=') {
        Some((title, path)) if !title.is_empty() && !path.is_empty() => {
            ReportPage::new(path).with_title(Some(title.to_owned()))
        }
        _ => ReportPage::new(argument),
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let font_dir = match cli.fonts_dir {
        Some(directory) => {
            fonts::initialize(&directory)?;
            directory
        }
        None => fonts::initialize_default()?,
    };
    info!("Using fonts from {}", font_dir.display());

    let assets = match cli.assets_dir {
        Some(directory) => AssetPaths::in_directory(directory),
        None => AssetPaths::from_env(),
    };
    let labels = Labels::default()
        .with_date(cli.date_prefix)
        .with_total_visitors(cli.visitors_prefix);

    let request = ReportRequest::new(cli.title, cli.date_label)
        .with_total_visitors(cli.visitors)
        .with_pages(cli.pages.iter().map(|page| parse_page(page)));

    let builder = ReportBuilder::new().with_assets(assets).with_labels(labels);
    #[cfg(feature = "bookmarks")]
    let builder = builder.with_bookmarks(cli.bookmarks);

    let report = builder.write_to_file(&request, &cli.output)?;
    println!(
        "Generated {} ({} pages, {} bytes)",
        cli.output.display(),
        report.page_count,
        report.bytes.len()
    );
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
