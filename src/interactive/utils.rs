use std::fmt::Display;
use std::str::FromStr;

use tracing::warn;

pub fn prompt_text_handle_errors<T>(prompt: &str) -> eyre::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: Display,
{
    loop {
        let t = inquire::Text::new(prompt).prompt()?;

        if let Some(t) = parse_or_warn(&t) {
            return Ok(t);
        }
    }
}

pub fn prompt_secret_handle_errors<T>(prompt: &str) -> eyre::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: Display,
{
    loop {
        let t = inquire::Password::new(prompt)
            .without_confirmation()
            .prompt()?;

        if let Some(t) = parse_or_warn(&t) {
            return Ok(t);
        }
    }
}

fn parse_or_warn<T>(input: &str) -> Option<T>
where
    T: FromStr,
    <T as FromStr>::Err: Display,
{
    match input.trim().parse() {
        Ok(t) => Some(t),
        Err(e) => {
            warn!("Invalid input: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Url;

    use super::*;
    use crate::cli::PrivateKey;

    #[test]
    fn trims_and_parses_valid_input() {
        let url: Option<Url> = parse_or_warn("  http://127.0.0.1:8545 \n");

        assert_eq!(url.unwrap().as_str(), "http://127.0.0.1:8545/");
    }

    #[test]
    fn invalid_input_asks_again() {
        assert!(parse_or_warn::<Url>("not a url").is_none());
        assert!(parse_or_warn::<PrivateKey>("0xzz").is_none());
    }
}
