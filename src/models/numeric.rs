//! Lenient reading of numbers embedded in free-text vitals.
//!
//! Readings like `"101.2F"` or `"145 mmHg"` carry the value at the front
//! followed by units or noise. Only the leading number is read; the rest
//! of the string is ignored.

/// Leading integer of `raw` after leading whitespace: optional sign, then
/// digits. A fractional part ends the number (`"120.5"` reads as 120).
/// Values beyond `i32` saturate.
pub fn leading_int(raw: &str) -> Option<i32> {
    let s = raw.trim_start();
    let (negative, rest) = split_sign(s);

    let digits: &str = &rest[..digit_run(rest)];
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.bytes().fold(0i32, |acc, b| {
        acc.saturating_mul(10).saturating_add(i32::from(b - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

/// Leading decimal number of `raw` after leading whitespace: optional
/// sign, digits with an optional fraction, optional exponent, or the
/// literal `Infinity`. `None` when no digit leads.
pub fn leading_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let (negative, rest) = split_sign(s);

    if rest.starts_with("Infinity") {
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let int_len = digit_run(rest);
    let mut end = int_len;
    let mut frac_len = 0;
    if rest[end..].starts_with('.') {
        frac_len = digit_run(&rest[end + 1..]);
        end += 1 + frac_len;
    }
    if int_len + frac_len == 0 {
        return None;
    }

    if let Some(exp) = rest[end..].strip_prefix(['e', 'E']) {
        let (_, exp_digits) = split_sign(exp);
        let exp_len = digit_run(exp_digits);
        if exp_len > 0 {
            end += 1 + (exp.len() - exp_digits.len()) + exp_len;
        }
    }

    let value: f64 = rest[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

fn split_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else {
        (false, s.strip_prefix('+').unwrap_or(s))
    }
}

fn digit_run(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}
