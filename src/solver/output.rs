use crate::encoding::{Assignment, Literal};

/// Keywords of the statistics lines worth reporting
const STATISTICS_KEYWORDS: [&str; 4] = ["conflicts", "decisions", "propagations", "CPU time"];

/// Collects the model from all lines whose first token is `v`. Tokens that are no integers
/// are skipped and the terminating zeros are dropped.
pub fn parse_model(output: &str) -> Assignment {
    let literals = output
        .lines()
        .map(|line| line.split_whitespace())
        .filter_map(|mut tokens| (tokens.next() == Some("v")).then_some(tokens))
        .flatten()
        .filter_map(|token| token.parse::<Literal>().ok())
        .filter(|&lit| lit != 0)
        .collect();

    Assignment::new(literals)
}

/// Returns the comment lines (`c `, `c|` or `c |`) that mention one of the statistics keywords
pub fn extract_statistics(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("c ") || line.starts_with("c|"))
        .filter(|line| STATISTICS_KEYWORDS.iter().any(|key| line.contains(key)))
        .map(String::from)
        .collect()
}
