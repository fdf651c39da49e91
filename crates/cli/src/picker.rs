use console::{style, Term};
use deploy_selector::{BoxError, Picker, PromptConfig};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{MultiSelect, Select};

/// Terminal picker drawing on stderr so stdout stays machine-readable.
pub struct TermPicker {
    term: Term,
    theme: ColorfulTheme,
}

impl TermPicker {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
            theme: ColorfulTheme::default(),
        }
    }

    fn ensure_interactive(&self, message: &str) -> Result<(), BoxError> {
        if self.term.is_term() {
            return Ok(());
        }
        Err(format!("cannot ask \"{message}\" without an interactive terminal").into())
    }

    fn prompt_text(message: &str, help: &str) -> String {
        if help.is_empty() {
            message.to_string()
        } else {
            format!("{message} {}", style(format!("[{help}]")).dim())
        }
    }

    fn finish(&self, config: &PromptConfig, answer: &str) -> Result<(), BoxError> {
        if let Some(final_message) = &config.final_message {
            self.term
                .write_line(&format!("{} {}", style(final_message).bold(), answer))?;
        }
        Ok(())
    }
}

impl Default for TermPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Picker for TermPicker {
    fn select_one(
        &self,
        message: &str,
        help: &str,
        options: &[String],
        config: &PromptConfig,
    ) -> Result<String, BoxError> {
        self.ensure_interactive(message)?;
        let index = Select::with_theme(&self.theme)
            .with_prompt(Self::prompt_text(message, help))
            .items(options)
            .default(0)
            .interact_on_opt(&self.term)?
            .ok_or("selection cancelled")?;
        let answer = options
            .get(index)
            .cloned()
            .ok_or("selection out of range")?;
        self.finish(config, &answer)?;
        Ok(answer)
    }

    fn select_many(
        &self,
        message: &str,
        help: &str,
        options: &[String],
        config: &PromptConfig,
    ) -> Result<Vec<String>, BoxError> {
        self.ensure_interactive(message)?;
        let indices = MultiSelect::with_theme(&self.theme)
            .with_prompt(Self::prompt_text(message, help))
            .items(options)
            .interact_on_opt(&self.term)?
            .ok_or("selection cancelled")?;
        let answers: Vec<String> = indices
            .into_iter()
            .filter_map(|i| options.get(i).cloned())
            .collect();
        self.finish(config, &answers.join(", "))?;
        Ok(answers)
    }
}
