use crate::calc_engine::Step;

pub fn format_number(x: f64) -> String {
    if x.abs() > 1e10 || (x.abs() < 1e-5 && x != 0.0) {
        format!("{:.6e}", x)
    } else {
        let s = format!("{:.6}", x);
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        // -0.0 prints as "-0"
        if trimmed == "-0" {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// Renders one fold as `lhs op rhs`, each operand through [`format_number`].
pub fn format_step(step: &Step) -> String {
    format!("{} {} {}", format_number(step.lhs), step.op, format_number(step.rhs))
}

/// Puts single spaces around operators and drops all other whitespace.
pub fn format_with_spaces(expr: &str) -> String {
    let mut result = String::new();

    for c in expr.chars() {
        match c {
            '+' | '-' | '*' | '/' => {
                result.push(' ');
                result.push(c);
                result.push(' ');
            }
            _ if c.is_whitespace() => continue,
            _ => result.push(c),
        }
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_drop_trailing_zeros() {
        assert_eq!(format_number(14.0), "14");
        assert_eq!(format_number(13.5), "13.5");
        assert_eq!(format_number(1.0 / 3.0), "0.333333");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn extreme_magnitudes_use_scientific_notation() {
        assert_eq!(format_number(1e12), "1.000000e12");
        assert_eq!(format_number(0.000001), "1.000000e-6");
    }

    #[test]
    fn steps_keep_negative_operands_together() {
        let step = Step { lhs: -3.0, op: '-', rhs: 1.0, result: -4.0 };
        assert_eq!(format_step(&step), "-3 - 1");
    }

    #[test]
    fn steps_round_intermediate_operands() {
        let step = Step { lhs: 0.1 + 0.2, op: '+', rhs: 1.0, result: 1.3 };
        assert_eq!(format_step(&step), "0.3 + 1");
    }

    #[test]
    fn operators_get_spaced() {
        assert_eq!(format_with_spaces("2+3*4"), "2 + 3 * 4");
        assert_eq!(format_with_spaces("( 2+3 )  /4"), "(2 + 3) / 4");
        assert_eq!(format_with_spaces("6 - 3-2"), "6 - 3 - 2");
    }
}
