use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Parser;

use tts_translit::engines::esperanto::{
    RuleBasedTransliterator, RuleDocument, RuleSet, RuleSetError,
};

/// Respell Esperanto text for a Polish voice.
#[derive(Parser, Debug)]
#[command(name = "eo_translit", version)]
struct Args {
    /// Text to convert. Read from stdin when omitted.
    text: Vec<String>,

    /// JSON rule file to use instead of the bundled Esperanto rules
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Print the active rule document as JSON and exit
    #[arg(long)]
    dump_rules: bool,
}

/// Read the rule document and compile it, so a broken file is reported
/// before anything is printed.
fn load_rules(path: Option<&Path>) -> Result<(RuleDocument, RuleSet), RuleSetError> {
    let document = match path {
        Some(path) => RuleDocument::from_path(path)?,
        None => RuleDocument::esperanto_default()?,
    };
    let rules = RuleSet::from_document(document.clone())?;
    Ok((document, rules))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let (document, rules) = load_rules(args.rules.as_deref())?;

    if args.dump_rules {
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    let translit = RuleBasedTransliterator::new(rules);

    let text = if args.text.is_empty() {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        args.text.join(" ")
    };

    println!("{}", translit.convert(&text));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_rules_load() {
        let (document, rules) = load_rules(None).unwrap();
        assert_eq!(document.fragments.len(), rules.fragments().len());
    }

    #[test]
    fn invalid_rule_file_is_rejected_before_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, r#"{ "fragments": [ { "match": "^(sij", "replace": "syy" } ] }"#)
            .unwrap();
        let err = load_rules(Some(&path)).unwrap_err();
        assert!(matches!(err, RuleSetError::InvalidPattern { .. }));
    }
}
