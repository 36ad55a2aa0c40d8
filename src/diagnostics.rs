pub fn render(source: &str, kind: &str, line: usize, message: &str, hint: Option<&str>) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let line_idx = line.saturating_sub(1);
    let source_line = lines.get(line_idx).unwrap_or(&"");

    let line_num = line.to_string();
    let gutter_width = line_num.len();

    let mut out = String::new();

    // error[kind]: message
    out.push_str(&format!("error[{}]: {}\n", kind, message));

    // --> line N
    out.push_str(&format!("{:>width$}--> line {}\n", " ", line, width = gutter_width));

    // empty gutter line
    out.push_str(&format!("{:>width$} |\n", " ", width = gutter_width));

    // source line
    out.push_str(&format!(
        "{:>width$} | {}\n",
        line,
        source_line,
        width = gutter_width
    ));

    out.push_str(&format!("{:>width$} |\n", " ", width = gutter_width));

    // hint
    if let Some(hint) = hint {
        out.push_str(&format!(
            "{:>width$} = hint: {}\n",
            " ",
            hint,
            width = gutter_width
        ));
    }

    out
}

pub fn suggest_hint(message: &str) -> Option<String> {
    let msg = message.to_lowercase();

    if msg.contains("identifier not found") {
        return Some("define the name with 'let' before using it".into());
    }

    if msg.contains("not a function") {
        return Some("only func literals and builtin functions can be called".into());
    }

    if msg.contains("type mismatch") {
        return Some("both operands of an infix operator must have the same type".into());
    }

    if msg.contains("wrong number of arguments") || msg.contains("invalid number of arguments") {
        return Some("check the call against the function's parameter list".into());
    }

    if msg.contains("stack overflow") {
        return Some("a function is recursing without reaching a base case".into());
    }

    None
}
