use super::{MalformedTreeError, Node, NodeId, ParseTree};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum TokenKind<'a> {
    Open,
    Close,
    Label(&'a str),
}

#[derive(Clone, Copy, Debug)]
struct Token<'a> {
    kind: TokenKind<'a>,
    offset: usize,
}

fn is_separator(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0c')
}

/// Split a tree description into brackets and labels.
///
/// Labels end at whitespace or at a bracket, so `(NP(DT the))` and
/// `(NP (DT the))` yield the same tokens.
fn tokenize(desc: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut label_start = None;

    for (offset, ch) in desc.char_indices() {
        if ch == '(' || ch == ')' || is_separator(ch) {
            if let Some(start) = label_start.take() {
                tokens.push(Token {
                    kind: TokenKind::Label(&desc[start..offset]),
                    offset: start,
                });
            }

            match ch {
                '(' => tokens.push(Token {
                    kind: TokenKind::Open,
                    offset,
                }),
                ')' => tokens.push(Token {
                    kind: TokenKind::Close,
                    offset,
                }),
                _ => (),
            }
        } else if label_start.is_none() {
            label_start = Some(offset);
        }
    }

    if let Some(start) = label_start {
        tokens.push(Token {
            kind: TokenKind::Label(&desc[start..]),
            offset: start,
        });
    }

    tokens
}

/// Join tokens with the spacing that tree serialization produces.
fn join_tokens(tokens: &[Token]) -> String {
    let mut joined = String::new();
    let mut prev = None;

    for token in tokens {
        if let Some(prev) = prev {
            if prev != TokenKind::Open && token.kind != TokenKind::Close {
                joined.push(' ');
            }
        }

        match token.kind {
            TokenKind::Open => joined.push('('),
            TokenKind::Close => joined.push(')'),
            TokenKind::Label(label) => joined.push_str(label),
        }

        prev = Some(token.kind);
    }

    joined
}

/// Normalize the layout of a tree description.
///
/// Whitespace runs become a single space, leading and trailing
/// whitespace is removed, and brackets are spaced the way a serialized
/// tree is spaced: `( (S` becomes `((S` and `) )` becomes `))`.
pub fn normalize(desc: &str) -> String {
    join_tokens(&tokenize(desc))
}

pub(crate) fn parse(desc: &str) -> Result<ParseTree, MalformedTreeError> {
    let tokens = tokenize(desc);
    if tokens.is_empty() {
        return Err(MalformedTreeError::EmptyInput);
    }

    let mut nodes: Vec<Node> = Vec::new();
    // Open nodes with the offsets of their opening brackets.
    let mut stack: Vec<(NodeId, usize)> = Vec::new();
    let mut root_closed = false;

    for (idx, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Open => {
                let id = nodes.len();
                match stack.last() {
                    Some(&(parent, _)) => nodes[parent].children.push(id),
                    None if root_closed => {
                        return Err(MalformedTreeError::MultipleRoots {
                            offset: token.offset,
                        })
                    }
                    None => (),
                }

                nodes.push(Node::new(String::new()));
                stack.push((id, token.offset));
            }
            TokenKind::Close => {
                let (id, open_offset) = stack.pop().ok_or(MalformedTreeError::UnbalancedClose {
                    offset: token.offset,
                })?;

                if stack.is_empty() {
                    root_closed = true;
                } else if nodes[id].label.is_empty() {
                    return Err(MalformedTreeError::MissingLabel {
                        offset: open_offset,
                    });
                }
            }
            TokenKind::Label(label) => {
                let &(parent, _) =
                    stack
                        .last()
                        .ok_or_else(|| MalformedTreeError::LabelOutsideBrackets {
                            label: label.to_owned(),
                            offset: token.offset,
                        })?;

                match tokens.get(idx + 1).map(|next| next.kind) {
                    None => {
                        return Err(MalformedTreeError::UnexpectedEnd {
                            label: label.to_owned(),
                        })
                    }
                    // A label directly followed by a closing bracket is a terminal.
                    Some(TokenKind::Close) => {
                        let id = nodes.len();
                        nodes.push(Node::new(label.to_owned()));
                        nodes[parent].children.push(id);
                    }
                    // Otherwise it labels the node that is currently open.
                    Some(_) => {
                        if !nodes[parent].label.is_empty() {
                            return Err(MalformedTreeError::DuplicateLabel {
                                label: label.to_owned(),
                                offset: token.offset,
                            });
                        }

                        nodes[parent].label = label.to_owned();
                    }
                }
            }
        }
    }

    if !stack.is_empty() {
        return Err(MalformedTreeError::Unclosed { open: stack.len() });
    }

    let tree = ParseTree { nodes, root: 0 };

    // The serialized tree must reproduce the normalized input.
    let expected = join_tokens(&tokens);
    let found = tree.to_string();
    if expected != found {
        return Err(MalformedTreeError::RoundTrip { expected, found });
    }

    Ok(tree)
}
