//! Tokenizer and parser for the path mini-language.

use super::arc::ArcSegment;
use super::{PathCommand, PathError};
use crate::Vector2D;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Command(char),
    Number(f64),
}

fn tokenize(source: &str) -> Result<Vec<Token>, PathError> {
    let mut tokens = Vec::new();
    let mut number = String::new();

    let flush = |number: &mut String, tokens: &mut Vec<Token>| -> Result<(), PathError> {
        if number.is_empty() {
            return Ok(());
        }
        let value = number
            .parse::<f64>()
            .map_err(|_| PathError::InvalidNumber(number.clone()))?;
        tokens.push(Token::Number(value));
        number.clear();
        Ok(())
    };

    for ch in source.chars() {
        match ch {
            'M' | 'L' | 'H' | 'V' | 'A' | 'Q' | 'C' | 'Z' => {
                flush(&mut number, &mut tokens)?;
                tokens.push(Token::Command(ch));
            }
            ',' => flush(&mut number, &mut tokens)?,
            c if c.is_whitespace() => flush(&mut number, &mut tokens)?,
            'e' | 'E' if !number.is_empty() => number.push(ch),
            c if c.is_ascii_alphabetic() => return Err(PathError::UnknownCommand(c)),
            _ => number.push(ch),
        }
    }
    flush(&mut number, &mut tokens)?;
    Ok(tokens)
}

const fn arity(command: char) -> usize {
    match command {
        'M' | 'L' => 2,
        'H' | 'V' => 1,
        'Q' => 4,
        'C' => 6,
        'A' => 7,
        _ => 0,
    }
}

fn build(command: char, args: &[f64]) -> PathCommand {
    let v = |i: usize| Vector2D::new(args[i], args[i + 1]);
    match command {
        'M' => PathCommand::Move(v(0)),
        'L' => PathCommand::Line(v(0)),
        'H' => PathCommand::Horizontal(args[0]),
        'V' => PathCommand::Vertical(args[0]),
        'Q' => PathCommand::Quadratic {
            control: v(0),
            to: v(2),
        },
        'C' => PathCommand::Cubic {
            control1: v(0),
            control2: v(2),
            to: v(4),
        },
        'A' => PathCommand::Arc(ArcSegment {
            radii: v(0),
            rotation: args[2],
            large_arc: args[3] != 0.0,
            sweep: args[4] != 0.0,
            to: v(5),
        }),
        _ => PathCommand::Close,
    }
}

/// Parse path source into commands.
///
/// A command letter may be followed by several argument groups; extra groups
/// after `M` are treated as `L`, matching SVG.
pub(super) fn parse(source: &str) -> Result<Vec<PathCommand>, PathError> {
    let tokens = tokenize(source)?;
    let mut commands = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let Token::Command(letter) = tokens[i] else {
            return Err(PathError::MissingCommand(i));
        };
        i += 1;

        let n = arity(letter);
        if n == 0 {
            commands.push(PathCommand::Close);
            continue;
        }

        let mut current = letter;
        let mut groups = 0;
        loop {
            let args: Vec<f64> = tokens[i..]
                .iter()
                .take(n)
                .map_while(|t| match t {
                    Token::Number(v) => Some(*v),
                    Token::Command(_) => None,
                })
                .collect();
            if args.is_empty() && groups > 0 {
                break;
            }
            if args.len() < n {
                return Err(PathError::MissingArguments {
                    command: letter,
                    expected: n,
                    found: args.len(),
                });
            }
            commands.push(build(current, &args));
            i += n;
            groups += 1;
            if current == 'M' {
                current = 'L';
            }
        }
    }

    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators_and_glued_letters() {
        let cmds = parse("M10,20 L 30 40Z").unwrap();
        assert_eq!(
            cmds,
            vec![
                PathCommand::Move(Vector2D::new(10.0, 20.0)),
                PathCommand::Line(Vector2D::new(30.0, 40.0)),
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn test_repeated_groups_after_move_become_lines() {
        let cmds = parse("M 0 0 10 0 10 10").unwrap();
        assert_eq!(cmds.len(), 3);
        assert!(matches!(cmds[2], PathCommand::Line(_)));
    }

    #[test]
    fn test_arc_arguments() {
        let cmds = parse("M 0 -50 A 50 50 0 0 1 50 0").unwrap();
        let PathCommand::Arc(arc) = cmds[1] else {
            panic!("expected arc, got {:?}", cmds[1]);
        };
        assert_eq!(arc.radii, Vector2D::new(50.0, 50.0));
        assert!(!arc.large_arc);
        assert!(arc.sweep);
        assert_eq!(arc.to, Vector2D::new(50.0, 0.0));
    }

    #[test]
    fn test_exponent_numbers() {
        let cmds = parse("M 1e2 -2.5E-1").unwrap();
        assert_eq!(cmds, vec![PathCommand::Move(Vector2D::new(100.0, -0.25))]);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(parse("M 1"), Err(PathError::MissingArguments { .. })));
        assert!(matches!(parse("X 1 2"), Err(PathError::UnknownCommand('X'))));
        assert!(matches!(parse("10 20"), Err(PathError::MissingCommand(0))));
        assert!(matches!(parse("M 1 2..3"), Err(PathError::InvalidNumber(_))));
    }
}
