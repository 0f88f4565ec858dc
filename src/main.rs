use clap::{Parser, ValueEnum};
use facegrab::fetch::HttpFetcher;
use facegrab::manifest::{self, ManifestVariant};
use facegrab::{materialize, output};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "facegrab")]
#[command(about = "Download labeled face images from a TSV manifest")]
#[command(long_about = "\
Download labeled face images from a TSV manifest

Each manifest row names a person, an image id, a source URL, a face bounding
box, and a content hash. For every row facegrab fetches the image and writes
two JPEGs:

  <ROOT>/<person>/<imageId>.jpg        full image
  <ROOT>_crop/<person>/<imageId>.jpg   face crop

The crop tree is a sibling of the output root, not nested under it.

Manifest variants:

  five-col (default)   name \\t imageId \\t url \\t bbox \\t hash
                       1 header row skipped
  six-col              name \\t imageId \\t faceId \\t url \\t bbox \\t hash
                       2 header rows skipped

bbox format is \"x0,y0,x1,y1\" in source-image pixel coordinates. Rows with
dead URLs, undecodable bodies, or bad boxes are logged and skipped; the run
only aborts if the manifest itself cannot be parsed.")]
#[command(version)]
struct Cli {
    /// Tab-separated manifest file
    manifest: PathBuf,

    /// Output root; crops land in a sibling <ROOT>_crop tree
    output_root: PathBuf,

    /// Manifest column layout
    #[arg(long, value_enum, default_value_t = VariantArg::FiveCol)]
    variant: VariantArg,

    /// Header rows to skip (defaults to the variant's convention)
    #[arg(long)]
    header_rows: Option<usize>,

    /// Per-request fetch timeout in seconds
    #[arg(long, default_value_t = 1)]
    timeout: u64,

    /// Worker threads; 1 keeps records sequential and output in manifest order
    #[arg(long, default_value_t = 1)]
    jobs: usize,
}

#[derive(ValueEnum, Clone, Copy)]
enum VariantArg {
    /// 5 columns, 1 header row
    FiveCol,
    /// 6 columns with a face id, 2 header rows
    SixCol,
}

impl From<VariantArg> for ManifestVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::FiveCol => ManifestVariant::FiveColumn,
            VariantArg::SixCol => ManifestVariant::SixColumn,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let variant = ManifestVariant::from(cli.variant);
    let header_rows = cli
        .header_rows
        .unwrap_or_else(|| variant.default_header_rows());

    let records = manifest::parse_with_header_rows(&cli.manifest, variant, header_rows)?;
    println!(
        "==> {} records from {}",
        records.len(),
        cli.manifest.display()
    );

    init_thread_pool(cli.jobs);
    let fetcher = HttpFetcher::new(Duration::from_secs(cli.timeout));

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for outcome in rx {
            output::print_record_outcome(&outcome);
        }
    });

    let summary = materialize::run(&fetcher, &records, &cli.output_root, cli.jobs, Some(tx));

    printer.join().unwrap();
    output::print_run_summary(&summary);

    Ok(())
}

/// Initialize the rayon thread pool for `--jobs`.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(jobs: usize) {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.clamp(1, cores))
        .build_global()
        .ok();
}
