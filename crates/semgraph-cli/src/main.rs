use semgraph::layout::{Algorithm, GridLayout, LayoutError};
use semgraph::{
    AesValue, Aesthetic, Condition, ExtractOptions, GraphOptions, HeadlessError, LabelExpr,
    LayoutSpec, NodeShape, ParameterTable, SemGraph, extract, prepare_sem_graph,
};
use semgraph::render::render_svg;
use serde::Serialize;
use std::io::Read;
use std::str::FromStr;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Invalid(String),
    Io(std::io::Error),
    Graph(HeadlessError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Invalid(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Graph(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Graph(value)
    }
}

impl From<semgraph::Error> for CliError {
    fn from(value: semgraph::Error) -> Self {
        Self::Graph(value.into())
    }
}

impl From<LayoutError> for CliError {
    fn from(value: LayoutError) -> Self {
        Self::Graph(value.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum OutputFormat {
    #[default]
    Svg,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StyleTarget {
    Nodes,
    Edges,
}

#[derive(Debug, Clone)]
enum Assignment {
    Aes(Aesthetic, AesValue),
    /// `shape=` on the node table.
    Shape(NodeShape),
}

/// One `--style TABLE:PREDICATE:AES=VALUE` argument.
#[derive(Debug, Clone)]
struct StyleRule {
    target: StyleTarget,
    condition: Condition,
    assignment: Assignment,
}

impl StyleRule {
    fn parse(raw: &str) -> Result<Self, CliError> {
        let invalid = |why: &str| CliError::Invalid(format!("invalid --style `{raw}`: {why}"));
        let Some((table, rest)) = raw.split_once(':') else {
            return Err(invalid("expected TABLE:PREDICATE:AES=VALUE"));
        };
        let Some((predicate, assignment)) = rest.rsplit_once(':') else {
            return Err(invalid("expected TABLE:PREDICATE:AES=VALUE"));
        };
        let Some((aes, value)) = assignment.split_once('=') else {
            return Err(invalid("expected AES=VALUE after the predicate"));
        };
        let target = match table.trim().to_ascii_lowercase().as_str() {
            "nodes" | "node" => StyleTarget::Nodes,
            "edges" | "edge" => StyleTarget::Edges,
            _ => return Err(invalid("table must be `nodes` or `edges`")),
        };
        let assignment = match (target, aes.trim().to_ascii_lowercase().as_str()) {
            (StyleTarget::Nodes, "shape") => Assignment::Shape(value.parse()?),
            (StyleTarget::Edges, "shape") => return Err(invalid("only nodes have a shape")),
            _ => Assignment::Aes(aes.parse()?, AesValue::parse(value.trim())),
        };
        Ok(Self {
            target,
            condition: Condition::parse(predicate)?,
            assignment,
        })
    }

    fn apply(&self, graph: SemGraph) -> Result<SemGraph, CliError> {
        let condition = &self.condition;
        let styled = match (self.target, &self.assignment) {
            (StyleTarget::Nodes, Assignment::Shape(shape)) => {
                graph.edit_nodes(|nodes| nodes.with_shape_where(condition, *shape))?
            }
            (StyleTarget::Nodes, Assignment::Aes(aes, value)) => graph
                .edit_nodes(|nodes| nodes.with_aes_where(condition, *aes, value.clone()))?,
            (StyleTarget::Edges, Assignment::Aes(aes, value)) => graph
                .edit_edges(|edges| edges.with_aes_where(condition, *aes, value.clone()))?,
            (StyleTarget::Edges, Assignment::Shape(_)) => graph,
        };
        Ok(styled)
    }
}

#[derive(Debug, Default)]
struct Args {
    input: Option<String>,
    config: Option<String>,
    layout_file: Option<String>,
    algorithm: Option<Algorithm>,
    angle: Option<f64>,
    edge_label: Option<LabelExpr>,
    node_label: Option<LabelExpr>,
    variances: bool,
    means: bool,
    styles: Vec<StyleRule>,
    hide: Vec<String>,
    format: OutputFormat,
    pretty: bool,
    out: Option<String>,
}

fn usage() -> &'static str {
    "semgraph-cli\n\
\n\
USAGE:\n\
  semgraph-cli [--layout <grid-file> | --algorithm tree|circle|grid] [--angle <deg>] [--label <expr>] [--node-label <expr>] [--variances] [--means] [--style <table>:<predicate>:<aes>=<value>]... [--hide <node>]... [--config <json-file>] [--format svg|json] [--pretty] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - Input is a JSON array of parameter rows (lhs, op, rhs, est, se, pval, ...).\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - A grid file has one row per line; cells are comma or whitespace separated, '.' is blank.\n\
  - --style may repeat, e.g. --style 'edges:sig:colour=red' --style 'edges:est < 0:linetype=dashed'.\n\
  - Node rules may also set the shape: --style 'nodes:latent:shape=rect'.\n\
  - Output goes to stdout unless --out is given.\n\
  - Set SEMGRAPH_LOG (e.g. debug) to see pipeline logs on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        let mut value = || it.next().ok_or(CliError::Usage(usage()));
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--layout" => args.layout_file = Some(value()?.clone()),
            "--algorithm" => {
                let name = value()?;
                args.algorithm = Some(name.parse()?);
            }
            "--angle" => {
                let angle = value()?;
                args.angle = Some(angle.parse::<f64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--label" => args.edge_label = Some(LabelExpr::parse(value()?)?),
            "--node-label" => args.node_label = Some(LabelExpr::parse(value()?)?),
            "--variances" => args.variances = true,
            "--means" => args.means = true,
            "--style" => {
                let rule = value()?;
                args.styles.push(StyleRule::parse(rule)?);
            }
            "--hide" => args.hide.push(value()?.clone()),
            "--config" => args.config = Some(value()?.clone()),
            "--format" => {
                let fmt = value()?;
                args.format = fmt
                    .parse::<OutputFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--pretty" => args.pretty = true,
            "--out" => args.out = Some(value()?.clone()),
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if args.layout_file.is_some() && args.algorithm.is_some() {
        return Err(CliError::Invalid(
            "--layout and --algorithm are mutually exclusive".to_string(),
        ));
    }
    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn to_json(value: &impl Serialize, pretty: bool) -> Result<String, CliError> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

/// Config file first, then command-line flags on top.
fn graph_options(args: &Args) -> Result<GraphOptions, CliError> {
    let mut options = match &args.config {
        Some(path) => serde_json::from_str::<GraphOptions>(&std::fs::read_to_string(path)?)?,
        None => GraphOptions::default(),
    };
    let tables: &mut ExtractOptions = &mut options.extract;
    if let Some(label) = &args.edge_label {
        tables.edge_label = label.clone();
    }
    if let Some(label) = &args.node_label {
        tables.node_label = label.clone();
    }
    tables.include_variances |= args.variances;
    tables.include_means |= args.means;
    if args.angle.is_some() {
        options.prepare.angle = args.angle;
    }
    Ok(options)
}

fn layout_spec(args: &Args) -> Result<LayoutSpec, CliError> {
    if let Some(path) = &args.layout_file {
        return Ok(LayoutSpec::Grid(GridLayout::parse(&std::fs::read_to_string(
            path,
        )?)?));
    }
    Ok(LayoutSpec::Algorithm(args.algorithm.clone().unwrap_or_default()))
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("SEMGRAPH_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<(), CliError> {
    let options = graph_options(&args)?;
    let layout = layout_spec(&args)?;
    let table = ParameterTable::from_json_str(&read_input(args.input.as_deref())?)?;
    tracing::debug!(rows = table.len(), "read parameter table");

    let mut graph = extract(&table, &options.extract)?;
    for rule in &args.styles {
        graph = rule.apply(graph)?;
    }
    if !args.hide.is_empty() {
        let names: Vec<&str> = args.hide.iter().map(String::as_str).collect();
        graph = graph.hide_var(&names)?;
    }

    let prepared = prepare_sem_graph(graph, &layout, &options)?;
    let text = match args.format {
        OutputFormat::Svg => render_svg(&prepared, &options.svg),
        OutputFormat::Json => to_json(&prepared, args.pretty)?,
    };
    write_text(&text, args.out.as_deref())
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    init_logging();
    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
