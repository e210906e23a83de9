mod logging;

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use clap::Parser;
use ibm1align::{
    load_bitext,
    write_alignments,
    AlignError,
    CorpusLayout,
    DecodeOptions,
    Estimator,
    Smoothing,
    TrainOptions,
};
use logging::LogArgs;

/// Train IBM Model 1 on a parallel corpus and print one alignment per line.
#[derive(clap::Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[clap(flatten)]
    logging: LogArgs,

    /// Data directory.
    #[arg(short = 'd', long, default_value = "data")]
    datadir: PathBuf,

    /// Prefix of the parallel data files.
    #[arg(short = 'p', long, default_value = "hansards")]
    prefix: String,

    /// Suffix of the source language file.
    #[arg(short = 'f', long, default_value = "fr")]
    source_suffix: String,

    /// Suffix of the target language file.
    #[arg(short = 'e', long, default_value = "en")]
    target_suffix: String,

    /// Source file; overrides the data directory layout.
    #[arg(long)]
    source: Option<PathBuf>,

    /// Target file; overrides the data directory layout.
    #[arg(long)]
    target: Option<PathBuf>,

    /// Number of sentence pairs to train on and align.
    #[arg(short = 'n', long)]
    num_sentences: Option<usize>,

    /// Number of EM iterations.
    #[arg(short = 'i', long, default_value_t = ibm1align::config::DEFAULT_ITERATIONS)]
    iterations: usize,

    /// Alignment threshold.
    #[arg(short = 't', long, default_value_t = ibm1align::config::DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Null placeholder mass for the uniform prior.
    #[arg(long, default_value_t = ibm1align::config::DEFAULT_NULLS)]
    nulls: f64,

    /// Enable additive smoothing of responsibilities.
    #[arg(long)]
    smoothing: bool,

    /// Smoothing pseudo-count.
    #[arg(long, default_value_t = ibm1align::config::DEFAULT_SMOOTHING_N)]
    smoothing_n: f64,

    /// Smoothing vocabulary size.
    #[arg(long, default_value_t = ibm1align::config::DEFAULT_SMOOTHING_V)]
    smoothing_v: f64,

    /// Output file for alignments; stdout if omitted.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Write the trained translation table to this file.
    #[arg(long)]
    dump_table: Option<PathBuf>,
}

impl Args {
    fn train_options(&self) -> TrainOptions {
        TrainOptions {
            iterations: self.iterations,
            nulls: self.nulls,
            smoothing: if self.smoothing {
                Smoothing::Additive {
                    n: self.smoothing_n,
                    v: self.smoothing_v,
                }
            } else {
                Smoothing::Disabled
            },
        }
    }

    fn corpus_paths(&self) -> (PathBuf, PathBuf) {
        let layout = CorpusLayout {
            datadir: self.datadir.clone(),
            prefix: self.prefix.clone(),
            source_suffix: self.source_suffix.clone(),
            target_suffix: self.target_suffix.clone(),
        };
        (
            self.source.clone().unwrap_or_else(|| layout.source_path()),
            self.target.clone().unwrap_or_else(|| layout.target_path()),
        )
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> AlignError + '_ {
    move |source| AlignError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn create(path: &Path) -> Result<BufWriter<File>, AlignError> {
    File::create(path).map(BufWriter::new).map_err(io_error(path))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    args.logging.setup_logging(3)?;

    let train_options = args.train_options();
    train_options.validate()?;
    let decode_options = DecodeOptions {
        threshold: args.threshold,
    };
    decode_options.validate()?;

    let (source, target) = args.corpus_paths();
    let bitext = load_bitext(&source, &target, args.num_sentences)?;

    let mut estimator = Estimator::new(&bitext, train_options)?;
    estimator.train()?;
    let model = estimator.finalize();

    if let Some(path) = &args.dump_table {
        log::info!("writing translation table to {}", path.display());
        let mut writer = create(path)?;
        model
            .table()
            .write_to(&mut writer)
            .and_then(|_| writer.flush())
            .map_err(io_error(path))?;
    }

    let alignments = model.align(&bitext, &decode_options)?;
    match &args.output {
        Some(path) => {
            let mut writer = create(path)?;
            write_alignments(&mut writer, &alignments).map_err(io_error(path))?;
        }
        None => write_alignments(&mut BufWriter::new(std::io::stdout().lock()), &alignments)?,
    }

    Ok(())
}
