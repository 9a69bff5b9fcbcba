//! Interactive option menu and line prompts.
//!
//! Prompts read whole lines from any `BufRead` so the menu can be driven by
//! stdin in production and by a byte buffer in tests. End of input is treated
//! as "exit" at the menu and as an error inside a multi-step prompt.

use std::io::{self, BufRead, Write};

use crate::error::AppError;

const RULE_WIDTH: usize = 30;

const OPTIONS: [&str; 6] = [
    "1. Get the information about the trends of certain keywords from the keyword file",
    "2. Export the report of the top 10 most searched keywords",
    "3. Export the report of the information of the keywords by topic and by month in 2020",
    "4. Export a line chart of the top 5 most searched keywords in 2020",
    "5. Export a bar chart of the top 5 most searched keywords in 2019",
    "6. Find and display the information of the top 5 most searched keywords in both 2020 and 2019",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Ingest,
    TopTen,
    ByTopic,
    LineChart,
    BarChart,
    TopFive,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().parse::<u32>().ok()? {
            1 => Some(MenuChoice::Ingest),
            2 => Some(MenuChoice::TopTen),
            3 => Some(MenuChoice::ByTopic),
            4 => Some(MenuChoice::LineChart),
            5 => Some(MenuChoice::BarChart),
            6 => Some(MenuChoice::TopFive),
            99 => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

/// Prompter bound to the process's stdin/stdout.
pub fn stdio() -> Prompter<io::StdinLock<'static>, io::Stdout> {
    Prompter::new(io::stdin().lock(), io::stdout())
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Write a line of user-facing output.
    pub fn say(&mut self, message: &str) -> Result<(), AppError> {
        writeln!(self.output, "{message}").map_err(|e| AppError::input(format!("Failed to write output: {e}")))
    }

    /// Print `label` and read one trimmed line. `None` at end of input.
    pub fn ask(&mut self, label: &str) -> Result<Option<String>, AppError> {
        write!(self.output, "{label}")
            .and_then(|_| self.output.flush())
            .map_err(|e| AppError::input(format!("Failed to write prompt: {e}")))?;

        let mut line = String::new();
        let bytes = self
            .input
            .read_line(&mut line)
            .map_err(|e| AppError::input(format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Like `ask`, but end of input is an error.
    pub fn ask_required(&mut self, label: &str) -> Result<String, AppError> {
        self.ask(label)?
            .ok_or_else(|| AppError::input("No input received."))
    }

    pub fn ask_count(&mut self, label: &str) -> Result<usize, AppError> {
        let raw = self.ask_required(label)?;
        raw.parse::<usize>()
            .map_err(|_| AppError::input(format!("Expected a whole number, got '{raw}'.")))
    }

    pub fn print_menu(&mut self) -> Result<(), AppError> {
        let rule = "-".repeat(RULE_WIDTH);
        self.say(&rule)?;
        self.say("    O P T I O N  M E N U")?;
        self.say(&rule)?;
        for option in OPTIONS {
            self.say(option)?;
        }
        self.say("...")?;
        self.say("99. Exit")
    }

    /// Read menu choices until a valid one arrives. End of input means exit.
    pub fn next_choice(&mut self) -> Result<MenuChoice, AppError> {
        loop {
            let Some(raw) = self.ask("Please enter a number from [1,2,3,4,5,6,99]: ")? else {
                return Ok(MenuChoice::Exit);
            };
            match MenuChoice::parse(&raw) {
                Some(choice) => return Ok(choice),
                None => self.say("Please only choose from the option menu")?,
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompter(input: &str) -> Prompter<&[u8], Vec<u8>> {
        Prompter::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn parse_accepts_only_menu_numbers() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::Ingest));
        assert_eq!(MenuChoice::parse(" 6 "), Some(MenuChoice::TopFive));
        assert_eq!(MenuChoice::parse("99"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("7"), None);
        assert_eq!(MenuChoice::parse("exit"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[test]
    fn invalid_choice_reprompts() {
        let mut p = prompter("abc\n42\n3\n");
        assert_eq!(p.next_choice().unwrap(), MenuChoice::ByTopic);
        let out = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(out.matches("Please only choose from the option menu").count(), 2);
    }

    #[test]
    fn end_of_input_exits_menu_but_fails_prompts() {
        let mut p = prompter("");
        assert_eq!(p.next_choice().unwrap(), MenuChoice::Exit);
        assert!(p.ask_required("path: ").is_err());
    }

    #[test]
    fn count_prompt_rejects_non_numbers() {
        let mut p = prompter("two\n2\n");
        assert!(p.ask_count("n: ").is_err());
        assert_eq!(p.ask_count("n: ").unwrap(), 2);
    }

    #[test]
    fn menu_lists_every_option() {
        let mut p = prompter("");
        p.print_menu().unwrap();
        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.contains("O P T I O N  M E N U"));
        assert!(out.contains("6. Find and display"));
        assert!(out.ends_with("99. Exit\n"));
    }
}
