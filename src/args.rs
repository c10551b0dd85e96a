use clap::Parser;

/// This is a meeting attendance analysis program.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// The year to analyze, for example 2024. It must match the year of exactly one member roster.
    #[clap(short, long, value_parser)]
    pub year: String,

    /// (default ALL) The meetings to analyze: ALL or a list of comma-separated meeting names (case-insensitive).
    /// The report lists the members who attended all of them.
    #[clap(short, long, value_parser)]
    pub meetings: Option<String>,

    /// (list of comma-separated meeting names or not specified) If specified, the members who attended
    /// any of these meetings are removed from the report.
    #[clap(short = 'x', long, value_parser)]
    pub exclude: Option<String>,

    /// If passed as an argument, the overlap table and edges are produced even if not all the meetings
    /// are selected.
    #[clap(long, takes_value = false)]
    pub overlap: bool,

    /// (directory path, default data) The directory containing the roster files (.csv or .xlsx).
    /// Setting this option overrides the directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub data: Option<String>,

    /// (file path, optional) A JSON file with the settings for reading the rosters.
    /// For more information about the file format, read the manual.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (directory path, default current directory) Where the CSV and JSON reports are written.
    /// Setting this option overrides the directory that may be specified with the --config option.
    #[clap(long, value_parser)]
    pub output_directory: Option<String>,

    /// (file name, default <year>_selected_attendance.csv) The file for the members matching the selection.
    #[clap(long, value_parser)]
    pub query_output: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the analysis will be written in JSON
    /// format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a summary in JSON format. If provided, the program will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
