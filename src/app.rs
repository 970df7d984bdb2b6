//! Application driver.
//!
//! Runs the interactive quote-request flow on the terminal: one prompt per
//! field, a review summary, and submission with retry. All wizard logic
//! lives in [`crate::state`]; this module only collects input, validates it
//! field by field, and dispatches committed values.

use crate::api::QuoteApi;
use crate::config::Config;
use crate::draft::FileDraftStore;
use crate::error::AppResult;
use crate::logger::FileLogger;
use crate::state::{Step, Step1Data, Step2Data, Step3Data, Wizard};
use crate::utils::validation::{
    format_number, parse_formatted_number, validate_cargo_value, validate_email,
    validate_required, ValidationResult,
};
use log::*;
use std::io::{self, BufRead, Write};

const LOG_FILE_NAME: &str = "quote-tui.log";

/// Vessel types offered on step 2 (free-form entries are also accepted).
pub const VESSEL_TYPES: [&str; 5] = [
    "Oil Tanker",
    "Bulk Carrier",
    "Container Ship",
    "General Cargo",
    "Refrigerated Cargo",
];

/// Coverage levels offered on step 3.
pub const COVERAGE_LEVELS: [&str; 3] = ["Basic", "Standard", "Premium"];

/// Typed at any field prompt to return to the previous step.
const BACK_COMMAND: &str = ":back";

/// Outcome of a single screen interaction.
///
enum Flow {
    Continue,
    Quit,
}

/// Oversees input processing, wizard transitions, and terminal output.
///
pub struct App {
    wizard: Wizard,
    api: QuoteApi,
}

impl App {
    /// Start a new application according to the given configuration. Returns
    /// the result of the application execution.
    ///
    pub async fn start(config: Config) -> AppResult<()> {
        let data_dir = config.data_dir()?.to_path_buf();
        FileLogger::init(&data_dir.join(LOG_FILE_NAME), LevelFilter::Info)?;

        info!("Starting application...");
        let store = FileDraftStore::new(&data_dir);
        debug!("Using draft file at {}", store.path().display());
        let wizard = Wizard::initialize(Box::new(store));
        let api = QuoteApi::new(&config.api_base_url, config.submit_timeout());

        let mut app = App { wizard, api };
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        app.run(&mut input, &mut output).await?;

        info!("Exiting application...");
        Ok(())
    }

    /// Build an application over an already-initialized wizard and API
    /// client. Used by tests and headless drivers.
    ///
    #[allow(dead_code)]
    pub fn new(wizard: Wizard, api: QuoteApi) -> App {
        App { wizard, api }
    }

    /// Drive the wizard until submission or quit.
    ///
    pub async fn run<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> AppResult<()> {
        writeln!(output, "Marine Cargo Quote Request")?;
        writeln!(output, "--------------------------")?;
        if self.wizard.state().current_step != Step::Step1 {
            writeln!(
                output,
                "Resuming your saved draft at step {}.",
                self.wizard.state().current_step.number()
            )?;
        }

        loop {
            if self.wizard.state().is_submitted {
                match self.screen_submitted(input, output)? {
                    Flow::Continue => continue,
                    Flow::Quit => break,
                }
            }

            let flow = match self.wizard.state().current_step {
                Step::Step1 => self.screen_step1(input, output)?,
                Step::Step2 => self.screen_step2(input, output)?,
                Step::Step3 => self.screen_step3(input, output)?,
                Step::Review => self.screen_review(input, output).await?,
            };
            if let Flow::Quit = flow {
                writeln!(output, "Your progress is saved. See you next time.")?;
                break;
            }
        }
        Ok(())
    }

    /// Step 1: company details.
    ///
    fn screen_step1<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> AppResult<Flow> {
        writeln!(output)?;
        writeln!(output, "Step 1 of 3: Company Information")?;

        let current = self.wizard.state().step1.clone();
        let company_name = match prompt_field(
            input,
            output,
            "Company name",
            &current.company_name,
            validate_required,
        )? {
            Prompt::Value(value) => value,
            Prompt::Back => return Ok(Flow::Continue), // already at the first step
            Prompt::Eof => return Ok(Flow::Quit),
        };
        self.wizard.update_step1(Step1Data {
            company_name: company_name.clone(),
            contact_email: current.contact_email.clone(),
        })?;

        let contact_email = match prompt_field(
            input,
            output,
            "Contact email",
            &current.contact_email,
            validate_email,
        )? {
            Prompt::Value(value) => value,
            Prompt::Back => return Ok(Flow::Continue),
            Prompt::Eof => return Ok(Flow::Quit),
        };
        self.wizard.update_step1(Step1Data {
            company_name,
            contact_email,
        })?;

        if let Err(e) = self.wizard.advance_from_step1() {
            writeln!(output, "  {}", e)?;
        }
        Ok(Flow::Continue)
    }

    /// Step 2: vessel details.
    ///
    fn screen_step2<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> AppResult<Flow> {
        writeln!(output)?;
        writeln!(output, "Step 2 of 3: Vessel Information (:back to go back)")?;

        let current = self.wizard.state().step2.clone();
        let vessel_name = match prompt_field(
            input,
            output,
            "Vessel name",
            &current.vessel_name,
            validate_required,
        )? {
            Prompt::Value(value) => value,
            Prompt::Back => {
                self.wizard.go_back()?;
                return Ok(Flow::Continue);
            }
            Prompt::Eof => return Ok(Flow::Quit),
        };
        self.wizard.update_step2(Step2Data {
            vessel_name: vessel_name.clone(),
            vessel_type: current.vessel_type.clone(),
        })?;

        writeln!(output, "  Vessel types:")?;
        for (i, vessel_type) in VESSEL_TYPES.iter().enumerate() {
            writeln!(output, "    {}. {}", i + 1, vessel_type)?;
        }
        let vessel_type = match prompt_choice(
            input,
            output,
            "Vessel type",
            &current.vessel_type,
            &VESSEL_TYPES,
        )? {
            Prompt::Value(value) => value,
            Prompt::Back => {
                self.wizard.go_back()?;
                return Ok(Flow::Continue);
            }
            Prompt::Eof => return Ok(Flow::Quit),
        };
        self.wizard.update_step2(Step2Data {
            vessel_name,
            vessel_type,
        })?;

        if let Err(e) = self.wizard.advance_from_step2() {
            writeln!(output, "  {}", e)?;
        }
        Ok(Flow::Continue)
    }

    /// Step 3: coverage details.
    ///
    fn screen_step3<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> AppResult<Flow> {
        writeln!(output)?;
        writeln!(output, "Step 3 of 3: Coverage (:back to go back)")?;

        let current = self.wizard.state().step3.clone();
        writeln!(output, "  Coverage levels:")?;
        for (i, level) in COVERAGE_LEVELS.iter().enumerate() {
            writeln!(output, "    {}. {}", i + 1, level)?;
        }
        let coverage_level = match prompt_choice(
            input,
            output,
            "Coverage level",
            &current.coverage_level,
            &COVERAGE_LEVELS,
        )? {
            Prompt::Value(value) => value,
            Prompt::Back => {
                self.wizard.go_back()?;
                return Ok(Flow::Continue);
            }
            Prompt::Eof => return Ok(Flow::Quit),
        };
        self.wizard.update_step3(Step3Data {
            coverage_level: coverage_level.clone(),
            cargo_value: current.cargo_value,
        })?;

        let shown_value = if current.cargo_value > 0.0 {
            format_number(current.cargo_value)
        } else {
            String::new()
        };
        let cargo_text = match prompt_field(
            input,
            output,
            "Cargo value (USD)",
            &shown_value,
            validate_cargo_value,
        )? {
            Prompt::Value(value) => value,
            Prompt::Back => {
                self.wizard.go_back()?;
                return Ok(Flow::Continue);
            }
            Prompt::Eof => return Ok(Flow::Quit),
        };
        // The validator accepted it, so the parse cannot fail; fall back to
        // the previous committed value rather than panic.
        let cargo_value = parse_formatted_number(&cargo_text).unwrap_or(current.cargo_value);
        self.wizard.update_step3(Step3Data {
            coverage_level,
            cargo_value,
        })?;

        if let Err(e) = self.wizard.advance_to_review() {
            writeln!(output, "  {}", e)?;
        }
        Ok(Flow::Continue)
    }

    /// Review screen: summary plus submit/back/quit.
    ///
    async fn screen_review<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> AppResult<Flow> {
        let state = self.wizard.state();
        writeln!(output)?;
        writeln!(output, "Review your quote request")?;
        writeln!(output, "  Company:        {}", state.step1.company_name)?;
        writeln!(output, "  Contact email:  {}", state.step1.contact_email)?;
        writeln!(output, "  Vessel:         {}", state.step2.vessel_name)?;
        writeln!(output, "  Vessel type:    {}", state.step2.vessel_type)?;
        writeln!(output, "  Coverage:       {}", state.step3.coverage_level)?;
        writeln!(
            output,
            "  Cargo value:    ${}",
            format_number(state.step3.cargo_value)
        )?;
        if let Some(error) = &state.submit_error {
            writeln!(output, "  Last attempt failed: {}", error)?;
        }

        write!(output, "[s]ubmit, [b]ack, or [q]uit: ")?;
        output.flush()?;
        let line = match read_line(input)? {
            Some(line) => line,
            None => return Ok(Flow::Quit),
        };

        match line.trim().to_lowercase().as_str() {
            "s" | "submit" => {
                writeln!(output, "Submitting...")?;
                self.wizard.submit(&self.api).await?;
                if let Some(error) = &self.wizard.state().submit_error {
                    writeln!(output, "Submission failed: {}", error)?;
                    writeln!(output, "Your draft is saved; you can retry.")?;
                }
                Ok(Flow::Continue)
            }
            "b" | "back" => {
                self.wizard.go_back()?;
                Ok(Flow::Continue)
            }
            "q" | "quit" => Ok(Flow::Quit),
            other => {
                writeln!(output, "Unrecognized choice '{}'.", other)?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Terminal success view.
    ///
    fn screen_submitted<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> AppResult<Flow> {
        writeln!(output)?;
        writeln!(output, "Quote request submitted successfully!")?;
        write!(output, "[n]ew quote or [q]uit: ")?;
        output.flush()?;
        let line = match read_line(input)? {
            Some(line) => line,
            None => return Ok(Flow::Quit),
        };

        match line.trim().to_lowercase().as_str() {
            "n" | "new" => {
                self.wizard.reset()?;
                Ok(Flow::Continue)
            }
            _ => Ok(Flow::Quit),
        }
    }
}

/// Outcome of a single field prompt.
///
enum Prompt {
    Value(String),
    Back,
    Eof,
}

/// Read one line; `None` means end of input.
///
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut buffer = String::new();
    if input.read_line(&mut buffer)? == 0 {
        return Ok(None);
    }
    Ok(Some(buffer.trim_end_matches(|c| c == '\r' || c == '\n').to_string()))
}

/// Prompt for a field until the validator accepts, showing the committed
/// value as the default. An empty answer keeps the default when one exists.
///
fn prompt_field<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    current: &str,
    validate: impl Fn(&str) -> ValidationResult,
) -> io::Result<Prompt> {
    loop {
        if current.is_empty() {
            write!(output, "  {}: ", label)?;
        } else {
            write!(output, "  {} [{}]: ", label, current)?;
        }
        output.flush()?;

        let line = match read_line(input)? {
            Some(line) => line,
            None => return Ok(Prompt::Eof),
        };
        if line == BACK_COMMAND {
            return Ok(Prompt::Back);
        }
        let value = if line.is_empty() && !current.is_empty() {
            current.to_string()
        } else {
            line
        };

        let result = validate(&value);
        match result.error {
            None => return Ok(Prompt::Value(value)),
            Some(message) => writeln!(output, "  {}", message)?,
        }
    }
}

/// Prompt for one of a fixed set of options, accepting either the 1-based
/// number or the option text.
///
fn prompt_choice<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    current: &str,
    options: &[&str],
) -> io::Result<Prompt> {
    loop {
        let answer = match prompt_field(input, output, label, current, validate_required)? {
            Prompt::Value(value) => value,
            other => return Ok(other),
        };

        if let Ok(index) = answer.parse::<usize>() {
            if index >= 1 && index <= options.len() {
                return Ok(Prompt::Value(options[index - 1].to_string()));
            }
        }
        if let Some(option) = options
            .iter()
            .find(|option| option.eq_ignore_ascii_case(&answer))
        {
            return Ok(Prompt::Value(option.to_string()));
        }

        writeln!(output, "  Please pick one of the listed options.")?;
    }
}
