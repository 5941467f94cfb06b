use clap::Parser;

/// Generates the satisfaction survey report for a service unit (UDS).
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The Excel file with the survey responses. The first row
    /// holds the question headers, every following row one respondent.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// (optional) Name of the service unit. When omitted, the name is derived
    /// from the input file name (underscores become spaces, title-cased).
    #[clap(short = 'n', long, value_parser)]
    pub uds_name: Option<String>,

    /// (directory, default '.') Where the report manifest and the chart
    /// images are written.
    #[clap(short, long, value_parser)]
    pub out_dir: Option<String>,

    /// (directory, default '.') Working directory scanned for uploaded banner
    /// images (encabezado.* and pie.*).
    #[clap(short, long, value_parser)]
    pub work_dir: Option<String>,

    /// (directory) Directory with the statically configured default banner
    /// images, used when the working directory has none.
    #[clap(long, value_parser)]
    pub static_images_dir: Option<String>,

    /// (file path) Explicit header image. Unlike the scanned locations, a
    /// missing file here is an error.
    #[clap(long, value_parser)]
    pub header_image: Option<String>,

    /// (file path) Explicit footer image. Same rules as --header-image.
    #[clap(long, value_parser)]
    pub footer_image: Option<String>,

    /// (file path) A reference manifest in JSON format. If provided, the
    /// generated manifest is checked against it.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// If passed as an argument, will turn on verbose logging to the standard
    /// output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
