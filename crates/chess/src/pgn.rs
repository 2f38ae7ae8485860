//! PGN movetext.

/// PGN export lines stay under this width.
const LINE_WIDTH: usize = 80;

/// Build the movetext for `sans`, starting at `first_move_number`.
///
/// `comments[i]`, if present and non-empty, is written as `{...}` after move
/// `i`. A Black move gets its own `N...` number when it opens the game or
/// follows a comment. The result token ends the text.
pub fn movetext(
    sans: &[String],
    comments: &[String],
    first_move_number: u32,
    white_first: bool,
    result: &str,
) -> String {
    let mut tokens = Vec::new();
    let mut number = first_move_number;
    let mut white_to_move = white_first;
    let mut needs_number = true;

    for (i, san) in sans.iter().enumerate() {
        if white_to_move {
            tokens.push(format!("{}.", number));
        } else if needs_number {
            tokens.push(format!("{}...", number));
        }
        tokens.push(san.clone());
        needs_number = false;

        if let Some(comment) = comments.get(i).filter(|c| !c.is_empty()) {
            tokens.push(format!("{{{}}}", comment.replace('}', ")")));
            needs_number = true;
        }

        if !white_to_move {
            number += 1;
        }
        white_to_move = !white_to_move;
    }
    tokens.push(result.to_string());

    wrap(&tokens)
}

fn wrap(tokens: &[String]) -> String {
    let mut out = String::new();
    let mut line_len = 0;
    for token in tokens {
        if line_len > 0 && line_len + 1 + token.len() > LINE_WIDTH {
            out.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(token);
        line_len += token.len();
    }
    out
}
