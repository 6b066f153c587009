use crate::models::Directive;

pub fn check(text: &str, directives: &[Directive]) {
    let n = text.len();
    let mut previous_end = 0;
    for d in directives {
        assert!(
            d.start >= 1 && d.start <= d.end && d.end <= n,
            "directive span out of bounds: {}..{} (text len: {})",
            d.start,
            d.end,
            n
        );
        assert_eq!(
            text.get(d.start - 1..d.start),
            Some("/"),
            "no slash before directive at {}",
            d.start
        );
        assert!(
            d.start > previous_end,
            "directive at {} overlaps the one ending at {}",
            d.start,
            previous_end
        );
        assert!(
            d.source(text).is_some_and(|s| s.starts_with(d.command.as_str())),
            "directive text at {}..{} does not start with its command {:?}",
            d.start,
            d.end,
            d.command
        );
        previous_end = d.end;
    }
}
