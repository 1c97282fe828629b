use clap::{ArgGroup, Parser};

/// Input command line arguments.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("input_mode")
        .required(true)
        .args(&["site_file", "list_gmms", "list_sigma_models"]),
))]
pub struct CmdArgs {
    /// Input CSV file containing site data (lon, lat, vs30, optional
    /// z1p0 and z2p5).
    ///
    /// Hazard curves are computed for every site against the bundled
    /// demonstration model.
    #[arg(short, long)]
    pub site_file: Option<String>,

    /// IMTs to compute, e.g. --imts PGA PGV "SA(1.0s)".
    #[arg(short, long, num_args = 1.., default_values_t = [String::from("PGA")])]
    pub imts: Vec<String>,

    /// Exceedance (sigma/truncation) model by name.
    ///
    /// Use `--list-sigma-models` to see available names.
    #[arg(short = 'm', long, default_value = "TRUNCATION_UPPER_ONLY")]
    pub sigma_model: String,

    /// Truncation level, in standard deviations.
    #[arg(short, long, default_value_t = 3.0)]
    pub truncation_level: f64,

    /// Output CSV file prefix; one `<prefix>_<index>.txt` per site, plus
    /// `<prefix>_levels.txt` when a return period is given.
    #[arg(short, long, default_value = "out_hazard_curves")]
    pub out_prefix: String,

    /// Return period in years for uniform hazard level extraction,
    /// e.g. 475.
    ///
    /// Levels are interpolated from the first requested IMT's total
    /// curves and written as a site grid.
    #[arg(short, long)]
    pub return_period: Option<f64>,

    /// Delimiter character for input and output CSV files.
    ///
    /// Defaults to tab (`'\t'`).
    #[arg(short, long, default_value = "\t")]
    pub delimeter: char,

    /// List all available GMM presets.
    #[arg(short, long)]
    pub list_gmms: bool,

    /// List all available sigma models.
    #[arg(long)]
    pub list_sigma_models: bool,
}
