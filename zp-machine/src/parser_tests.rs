use zp_core::Register;

use crate::instruction::Op;
use crate::parser::{parse, ParseError};

#[test]
fn empty_text_parses_to_nothing() {
    let p = parse("").unwrap();
    assert!(p.instructions.is_empty());
    assert!(p.labels.is_empty());
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let p = parse("hello there\n\n  #give gems 1 (indented, so a comment)\n#give gems 1\n").unwrap();
    assert_eq!(p.instructions.len(), 1);
    assert_eq!(
        p.instructions.get(0).unwrap().op,
        Op::Give {
            register: Register::Gems,
            amount: 1
        }
    );
}

#[test]
fn lines_fall_through_and_takes_default_else_to_next_line() {
    let p = parse("#take gems 10\n#give ammo 20\n").unwrap();
    let take = p.instructions.get(0).unwrap();
    assert_eq!(take.next, Some(1));
    assert_eq!(take.else_, Some(1));
    let give = p.instructions.get(1).unwrap();
    assert_eq!(give.next, None);
    assert_eq!(give.else_, None);
}

#[test]
fn chained_commands_link_through_else() {
    let p = parse("#take gems 10 take ammo 10 give ammo 90\n#give score 1\n").unwrap();
    assert_eq!(p.instructions.len(), 4);

    let first = p.instructions.get(0).unwrap();
    assert_eq!((first.next, first.else_), (Some(3), Some(1)));
    let second = p.instructions.get(1).unwrap();
    assert_eq!((second.next, second.else_), (Some(3), Some(2)));
    let third = p.instructions.get(2).unwrap();
    assert_eq!(third.next, Some(3));
}

#[test]
fn chained_commands_may_repeat_the_sigil() {
    let p = parse("#take gems 1 #give ammo 2\n").unwrap();
    assert_eq!(p.instructions.len(), 2);
    assert_eq!(p.instructions.get(0).unwrap().else_, Some(1));
}

#[test]
fn chained_sigil_may_stand_alone_or_introduce_a_jump() {
    let p = parse("#take gems 1 # give ammo 2\n").unwrap();
    assert_eq!(p.instructions.len(), 2);
    assert_eq!(
        p.instructions.get(1).unwrap().op,
        Op::Give {
            register: Register::Ammo,
            amount: 2
        }
    );

    let p = parse("#take gems 1 #out\n:out\n").unwrap();
    assert_eq!(
        p.instructions.get(1).unwrap().op,
        Op::Jump {
            label: "out".to_string()
        }
    );

    assert!(matches!(parse("#take gems 1 #\n"), Err(ParseError::Missing { line: 1, .. })));
}

#[test]
fn sigils_outside_a_chained_command_are_rejected() {
    let bad = |text: &str, token: &str| {
        assert_eq!(
            parse(text).unwrap_err(),
            ParseError::BadToken {
                line: 1,
                token: token.to_string()
            },
            "{:?}",
            text
        );
    };
    bad("#give gems #5\n", "#5");
    bad("#give #gems 5\n", "#gems");
    bad("##give gems 5\n", "#give");
    bad(":#lbl\n", "#lbl");
    bad("#take gems 1 give #ammo #2\n", "#ammo");
    bad("#take gems 1 ##give ammo 2\n", "#give");
    bad("#take #gems 1\n", "#gems");
}

#[test]
fn take_with_bare_word_chains_a_jump() {
    let p = parse("#take gems 10 toopoor\n#give ammo 20\n:toopoor\n").unwrap();
    assert_eq!(
        p.instructions.get(1).unwrap().op,
        Op::Jump {
            label: "toopoor".to_string()
        }
    );
    // Declared after the last command: resolves to end of program.
    assert_eq!(p.labels.get("toopoor"), Some(&None));
}

#[test]
fn labels_name_the_following_command_line() {
    let p = parse("#a\n#give gems 1\n:a\n:b\ncomment\n#give gems 2\n").unwrap();
    assert_eq!(p.labels.get("a"), Some(&Some(2)));
    assert_eq!(p.labels.get("b"), Some(&Some(2)));
}

#[test]
fn crlf_line_endings_are_accepted() {
    let p = parse("#give gems 1\r\n:done\r\n").unwrap();
    assert_eq!(p.instructions.len(), 1);
    assert!(p.labels.contains_key("done"));
}

#[test]
fn unknown_register_is_rejected() {
    let err = parse("#give keys 1\n").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnknownRegister {
            line: 1,
            name: "keys".to_string()
        }
    );
}

#[test]
fn bad_amounts_are_rejected() {
    assert!(matches!(
        parse("#give gems ten\n"),
        Err(ParseError::InvalidInteger { line: 1, .. })
    ));
    assert!(matches!(
        parse("#give gems 32768\n"),
        Err(ParseError::AmountOutOfRange { line: 1, .. })
    ));
    assert!(matches!(
        parse("#take gems 99999999999999999999\n"),
        Err(ParseError::AmountOutOfRange { line: 1, .. })
    ));
    assert!(parse("#give gems 32767\n").is_ok());
}

#[test]
fn malformed_tokens_are_rejected() {
    assert!(matches!(
        parse("#take gems 10 jump-to\n"),
        Err(ParseError::BadToken { line: 1, .. })
    ));
    assert!(matches!(parse("#\n"), Err(ParseError::Missing { line: 1, .. })));
    assert!(matches!(parse("#give gems\n"), Err(ParseError::Missing { line: 1, .. })));
    assert!(matches!(parse(":\n"), Err(ParseError::Missing { line: 1, .. })));
}

#[test]
fn trailing_words_are_rejected() {
    assert_eq!(
        parse("#give gems 1 give ammo 2\n").unwrap_err(),
        ParseError::Trailing {
            line: 1,
            token: "give".to_string()
        }
    );
    assert!(matches!(parse("#a b\n:a\n"), Err(ParseError::Trailing { .. })));
    assert!(matches!(parse(":a b\n"), Err(ParseError::Trailing { .. })));
}

#[test]
fn duplicate_labels_are_rejected() {
    let err = parse(":x\n#give gems 1\n:x\n").unwrap_err();
    assert_eq!(
        err,
        ParseError::DuplicateLabel {
            line: 3,
            label: "x".to_string()
        }
    );
}

#[test]
fn unresolved_labels_are_reported_together() {
    let err = parse("#nowhere\n#take gems 1 elsewhere\n#nowhere\n").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnresolvedLabels(vec!["nowhere".to_string(), "elsewhere".to_string()])
    );
    assert_eq!(err.to_string(), "unresolved labels: nowhere, elsewhere");
}
