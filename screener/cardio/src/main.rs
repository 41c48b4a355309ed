use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use cardio::{screen_form, screen_record, ScreeningReport};
use cardio_features::{FeatureKind, FormSchema, PatientForm};
use cardio_model::Predictor;
use clap::{Args, Parser, Subcommand};
use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "cardio",
    version,
    about = "A terminal screening tool for heart-disease risk",
    long_about = "cardio screens for heart-disease risk from thirteen clinical\n\
        measurements.\n\n\
        Answers are encoded exactly the way the bundled classifier was trained:\n\
        categorical answers map to their training codes, numeric answers pass\n\
        through a fitted scaler, and the predicted probability is reported as\n\
        one of three risk bands (Healthy, Borderline Risk, High Risk).\n\n\
        EXAMPLES:\n\
        \n  cardio form                          Fill the screening form interactively\n\
        \n  cardio screen record.json            Screen a JSON record\n\
        \n  cat record.json | cardio screen      Screen a record from stdin\n\
        \n  cardio json record.json              Print the report as JSON\n\
        \n  cardio schema                        List the form fields in model order"
)]
struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Classifier artifact JSON (defaults to the built-in demo model)
    #[arg(long, value_name = "FILE", requires = "scaler")]
    model: Option<PathBuf>,

    /// Scaler artifact JSON (defaults to the built-in demo scaler)
    #[arg(long, value_name = "FILE", requires = "model")]
    scaler: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fill the screening form interactively
    #[command(
        about = "Fill the screening form interactively",
        long_about = "Start an interactive form session that prompts for each\n\
            measurement in model order. Categorical prompts list the allowed\n\
            answers.\n\n\
            Commands:\n\
            \n  :help                 Show available commands\n\
            \n  :fields               List the form fields\n\
            \n  :values               Show the values entered so far\n\
            \n  :set <field> <value>  Change one field\n\
            \n  :unset <field>        Clear one field\n\
            \n  :submit               Encode, predict, and show the risk band\n\
            \n  :clear                Clear every field\n\
            \n  :quit                 Leave the session (also :q, :exit)"
    )]
    Form,

    /// Screen a JSON record and print a text report
    #[command(
        about = "Screen a JSON record and print a text report",
        long_about = "Reads a flat JSON object keyed by field name from FILE, or from\n\
            stdin if no file is given. Categorical values may be display labels\n\
            or training codes.\n\n\
            Exits 0 on success, 1 when the record fails validation or\n\
            prediction, and 2 on usage or I/O errors."
    )]
    Screen(ScreenArgs),

    /// Output the screening report as JSON
    #[command(about = "Output the screening report as JSON for downstream tooling")]
    Json(ScreenArgs),

    /// List the form fields in model order
    #[command(about = "List the form fields, kinds, and allowed labels in model order")]
    Schema,
}

#[derive(Debug, Args, Clone)]
struct ScreenArgs {
    /// Input JSON record (reads from stdin if not provided)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,
}

/// Interactive form session state. Prompts walk the schema in order;
/// commands start with ':'.
#[derive(Debug)]
struct FormSession {
    form: PatientForm,
    predictor: Predictor,
    cursor: usize,
}

impl FormSession {
    fn new(predictor: Predictor) -> Self {
        FormSession {
            form: PatientForm::new(),
            predictor,
            cursor: 0,
        }
    }

    fn prompt(&self) -> String {
        let schema = FormSchema::standard();
        match schema.iter().nth(self.cursor) {
            Some(spec) => match spec.kind {
                FeatureKind::Numeric => format!("{}> ", spec.label),
                FeatureKind::Categorical { feature } => {
                    format!("{} ({})> ", spec.label, feature.labels().join("/"))
                }
            },
            None => "cardio> ".to_string(),
        }
    }

    /// Move the cursor to the first unfilled field, or past the end
    /// when the form is complete.
    fn advance(&mut self) {
        let schema = FormSchema::standard();
        self.cursor = self
            .form
            .missing_fields()
            .first()
            .and_then(|name| schema.position(name))
            .unwrap_or(schema.len());
    }

    fn handle_line(&mut self, line: &str) -> (Vec<String>, bool) {
        let trimmed = line.trim();
        if trimmed.starts_with(':') {
            return self.handle_command(trimmed);
        }
        if trimmed.is_empty() {
            return (Vec::new(), false);
        }
        (self.handle_entry(trimmed), false)
    }

    fn handle_entry(&mut self, value: &str) -> Vec<String> {
        let schema = FormSchema::standard();
        let spec = match schema.iter().nth(self.cursor) {
            Some(spec) => spec,
            None => {
                return vec![
                    "all fields are filled; :submit to screen, :set <field> <value> to change one"
                        .to_string(),
                ]
            }
        };
        // Validate eagerly so a typo is caught at the prompt it was
        // typed at, not at submit.
        if let Err(e) = PatientForm::encode_field(spec, value) {
            return vec![format!("error: {e}")];
        }
        if let Err(e) = self.form.set(spec.name, value) {
            return vec![format!("error: {e}")];
        }
        self.advance();
        if self.form.is_complete() {
            vec!["all fields filled; :submit to screen, :values to review".to_string()]
        } else {
            Vec::new()
        }
    }

    fn handle_command(&mut self, trimmed: &str) -> (Vec<String>, bool) {
        if trimmed == ":help" {
            return (
                vec![
                    "commands: :help, :fields, :values, :set <field> <value>, :unset <field>, \
                     :submit, :clear, :quit"
                        .to_string(),
                    "enter a value at the prompt to fill the current field".to_string(),
                ],
                false,
            );
        }

        if trimmed == ":q" || trimmed == ":quit" || trimmed == ":exit" {
            return (Vec::new(), true);
        }

        if trimmed == ":fields" {
            return (schema_lines(), false);
        }

        if trimmed == ":values" {
            return (self.value_lines(), false);
        }

        if trimmed == ":submit" {
            return (self.submit(), false);
        }

        if trimmed == ":clear" {
            self.form.clear();
            self.advance();
            return (vec!["ok".to_string()], false);
        }

        if let Some(rest) = trimmed.strip_prefix(":unset") {
            let field = rest.trim();
            if field.is_empty() {
                return (vec!["error: usage: :unset <field>".to_string()], false);
            }
            return match self.form.unset(field) {
                Ok(()) => {
                    self.advance();
                    (vec!["ok".to_string()], false)
                }
                Err(e) => (vec![format!("error: {e}")], false),
            };
        }

        if let Some(rest) = trimmed.strip_prefix(":set") {
            let rest = rest.trim();
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) if !value.trim().is_empty() => (field, value.trim()),
                _ => return (vec!["error: usage: :set <field> <value>".to_string()], false),
            };
            let spec = match FormSchema::standard().spec(field) {
                Some(spec) => spec,
                None => return (vec![format!("error: unknown field `{field}`")], false),
            };
            if let Err(e) = PatientForm::encode_field(spec, value) {
                return (vec![format!("error: {e}")], false);
            }
            if let Err(e) = self.form.set(spec.name, value) {
                return (vec![format!("error: {e}")], false);
            }
            self.advance();
            return (vec!["ok".to_string()], false);
        }

        (vec![format!("error: unknown command '{trimmed}'")], false)
    }

    fn value_lines(&self) -> Vec<String> {
        FormSchema::standard()
            .iter()
            .map(|spec| match self.form.get(spec.name) {
                Some(value) if !value.trim().is_empty() => {
                    format!("{} = {}", spec.name, value.trim())
                }
                _ => format!("{} = <unset>", spec.name),
            })
            .collect()
    }

    fn submit(&self) -> Vec<String> {
        let report = screen_form(&self.form, &self.predictor);
        let mut out: Vec<String> = report
            .warnings
            .iter()
            .map(|w| format!("warning: {}", w.message))
            .collect();
        if report.is_ok() {
            out.extend(render_report(&report));
        } else {
            out.extend(report.errors.iter().map(|e| format!("error: {e}")));
        }
        out
    }
}

fn schema_lines() -> Vec<String> {
    FormSchema::standard()
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let kind = match spec.kind {
                FeatureKind::Numeric => "numeric".to_string(),
                FeatureKind::Categorical { feature } => feature.labels().join(" | "),
            };
            format!("{:>2}. {:<24} {} ({kind})", i + 1, spec.name, spec.label)
        })
        .collect()
}

fn render_report(report: &ScreeningReport) -> Vec<String> {
    let mut lines = Vec::new();
    if let (Some(probability), Some(summary), Some(advice)) =
        (report.probability, report.summary, report.advice)
    {
        lines.push(format!("probability: {:.1}%", probability * 100.0));
        lines.push(format!("risk: {summary}"));
        lines.push(format!("advice: {advice}"));
        lines.push(format!("note: {}", report.disclaimer));
    }
    lines
}

fn read_record_from_input(input: &Option<PathBuf>) -> Result<String, String> {
    if let Some(path) = input {
        fs::read_to_string(path).map_err(|e| format!("failed to read '{}': {e}", path.display()))
    } else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read from stdin: {e}"))?;
        Ok(buf)
    }
}

fn load_predictor(model: &Option<PathBuf>, scaler: &Option<PathBuf>) -> Result<Predictor, String> {
    let predictor = match (scaler, model) {
        (Some(scaler_path), Some(model_path)) => {
            Predictor::from_files(scaler_path, model_path).map_err(|e| e.to_string())?
        }
        _ => Predictor::demo(),
    };
    let expected = FormSchema::standard().len();
    if predictor.n_features() != expected {
        return Err(format!(
            "artifacts cover {} features, the screening form has {expected}",
            predictor.n_features()
        ));
    }
    info!(
        "using classifier `{}` v{} ({} features)",
        predictor.classifier().name,
        predictor.classifier().version,
        predictor.n_features()
    );
    Ok(predictor)
}

fn run_screen(args: &ScreenArgs, predictor: &Predictor, mode: OutputMode) -> i32 {
    let record = match read_record_from_input(&args.input) {
        Ok(record) => record,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };

    let report = screen_record(&record, predictor);
    match mode {
        OutputMode::Text => {
            for warning in &report.warnings {
                eprintln!("warning: {}", warning.message);
            }
            if !report.is_ok() {
                for e in &report.errors {
                    eprintln!("error: {e}");
                }
                return 1;
            }
            for line in render_report(&report) {
                println!("{line}");
            }
            0
        }
        OutputMode::Json => {
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("error: failed to serialize JSON: {e}");
                    return 2;
                }
            }
            if report.is_ok() {
                0
            } else {
                1
            }
        }
    }
}

fn run_form(predictor: Predictor) -> i32 {
    use rustyline::error::ReadlineError;
    use rustyline::Editor;
    let mut rl = match Editor::<(), rustyline::history::DefaultHistory>::new() {
        Ok(e) => e,
        Err(e) => {
            eprintln!("error: failed to initialize form session: {e}");
            return 2;
        }
    };

    println!("Heart Disease Risk Screener");
    println!("Answer each prompt in order; type :help for commands.");

    let mut session = FormSession::new(predictor);
    loop {
        match rl.readline(&session.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let _ = rl.add_history_entry(trimmed);
                }
                let (out, exit) = session.handle_line(&line);
                for l in out {
                    println!("{l}");
                }
                if exit {
                    return 0;
                }
            }
            Err(ReadlineError::Interrupted) => {
                continue;
            }
            Err(ReadlineError::Eof) => {
                return 0;
            }
            Err(e) => {
                eprintln!("error: form session failed: {e}");
                return 2;
            }
        }
    }
}

fn run_schema() -> i32 {
    for line in schema_lines() {
        println!("{line}");
    }
    0
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run_cli() -> i32 {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Command::Form);
    if let Command::Schema = command {
        return run_schema();
    }

    let predictor = match load_predictor(&cli.model, &cli.scaler) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };

    match command {
        Command::Form => run_form(predictor),
        Command::Screen(args) => run_screen(&args, &predictor, OutputMode::Text),
        Command::Json(args) => run_screen(&args, &predictor, OutputMode::Json),
        Command::Schema => run_schema(),
    }
}

fn main() {
    std::process::exit(run_cli());
}
