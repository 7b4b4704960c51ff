//! BMI derivation from the height and weight inputs.

/// Parse the numeric prefix of user input.
///
/// Leading whitespace is skipped and anything after the number is ignored, so
/// `"70kg"` reads as `70.0`. Returns `None` when the text does not start with a number.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        return Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+') | Some(b'-')) {
            exp_start += 1;
        }
        let exp_digits = count_digits(&bytes[exp_start.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_start + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// BMI from weight (kg) and height (cm), formatted with two decimals.
///
/// `None` when either input is not numeric, height is zero, or the result is not finite.
pub fn compute_bmi(weight: &str, height: &str) -> Option<String> {
    let weight = parse_leading_float(weight)?;
    let height = parse_leading_float(height)?;
    if height == 0.0 {
        return None;
    }

    let meters = height / 100.0;
    let bmi = weight / meters.powi(2);
    if !bmi.is_finite() {
        return None;
    }

    Some(to_fixed_2(bmi))
}

/// Two-decimal rendering where an exact tie rounds away from zero.
///
/// `{:.2}` rounds exact ties to even (`22.625` becomes `22.62`), but a stored BMI
/// must read `22.63`. A double sits exactly halfway between two hundredths only when
/// it is a multiple of 1/8, so that case is detected and rounded by hand.
fn to_fixed_2(value: f64) -> String {
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths.abs() < MAX_EXACT_EIGHTHS {
        let thousandths = eighths.abs() as u64 * 125;
        if thousandths % 10 == 5 {
            let hundredths = (thousandths + 5) / 10;
            let sign = if value < 0.0 { "-" } else { "" };
            return format!("{}{}.{:02}", sign, hundredths / 100, hundredths % 100);
        }
    }
    format!("{:.2}", value)
}

// Keeps `eighths * 125` inside u64 and `eighths` an exact integer.
const MAX_EXACT_EIGHTHS: f64 = (1u64 << 53) as f64;
