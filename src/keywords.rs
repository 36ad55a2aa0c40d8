use anyhow::Result;
use std::collections::HashMap;
use std::fs;

use crate::scanner::token::TokenType;

/// Builds the keyword table the scanner classifies identifiers against.
/// A JSON file may re-spell keywords (canonical name → spelling); entries
/// with an unknown canonical name are ignored.
pub fn load_keywords(path: Option<&str>) -> Result<HashMap<String, TokenType>> {
    let map: HashMap<String, String> = match path {
        Some(p) => {
            let contents = fs::read_to_string(p)?;
            serde_json::from_str(&contents)?
        }
        None => default_keywords(),
    };

    let mut keywords = HashMap::new();
    for (key, value) in map {
        if let Some(token_type) = str_to_token_type(&key) {
            keywords.insert(value, token_type);
        }
    }

    Ok(keywords)
}

fn default_keywords() -> HashMap<String, String> {
    HashMap::from([
        ("function".into(), "func".into()),
        ("let".into(), "let".into()),
        ("return".into(), "return".into()),
        ("true".into(), "true".into()),
        ("false".into(), "false".into()),
        ("if".into(), "if".into()),
        ("else".into(), "else".into()),
        ("for".into(), "for".into()),
    ])
}

fn str_to_token_type(s: &str) -> Option<TokenType> {
    match s {
        "function" => Some(TokenType::Function),
        "let" => Some(TokenType::Let),
        "return" => Some(TokenType::Return),
        "true" => Some(TokenType::True),
        "false" => Some(TokenType::False),
        "if" => Some(TokenType::If),
        "else" => Some(TokenType::Else),
        "for" => Some(TokenType::For),
        _ => None,
    }
}
