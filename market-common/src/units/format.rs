//! Display formatting with a single rounding policy.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places shown for percentages, prices and values
pub const DISPLAY_DECIMALS: u32 = 2;

/// Round a value for display: 2 places, midpoint away from zero.
pub fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

/// Format with exactly `places` decimals and thousands separators.
pub fn format_decimal(value: Decimal, places: u32) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", places as usize, rounded);
    group_thousands(&text)
}

/// Insert `,` between groups of three integer digits.
pub fn group_thousands(text: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// `75` → `"75.00%"`
pub fn format_percentage(percentage: Decimal) -> String {
    format!("{}%", format_decimal(percentage, DISPLAY_DECIMALS))
}

/// `100` with `"OPN"` → `"100.00 OPN"`
pub fn format_token_amount(amount: Decimal, symbol: &str) -> String {
    format!("{} {}", format_decimal(amount, DISPLAY_DECIMALS), symbol)
}

/// Whole share count with separators.
pub fn format_shares(shares: u128) -> String {
    group_thousands(&shares.to_string())
}

/// `5` → `"$5.00"`
pub fn format_usd(amount: Decimal) -> String {
    if amount.is_sign_negative() && !amount.is_zero() {
        format!("-${}", format_decimal(amount.abs(), DISPLAY_DECIMALS))
    } else {
        format!("${}", format_decimal(amount, DISPLAY_DECIMALS))
    }
}

/// USD estimate at a static rate; zero when the product leaves the decimal range.
pub fn usd_estimate(amount: Decimal, usd_rate: Decimal) -> Decimal {
    amount.checked_mul(usd_rate).unwrap_or(Decimal::ZERO)
}

/// Gateway URL for a content identifier.
pub fn gateway_url(gateway: &str, cid: &str) -> String {
    let cid = cid.trim().trim_start_matches("ipfs://");
    format!("{}/{}", gateway.trim_end_matches('/'), cid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_display_midpoint() {
        assert_eq!(round_display(dec!(1.005)), dec!(1.01));
        assert_eq!(round_display(dec!(1.004)), dec!(1.00));
        assert_eq!(round_display(dec!(33.3333)), dec!(33.33));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("100"), "100");
        assert_eq!(group_thousands("1234567.891"), "1,234,567.891");
        assert_eq!(group_thousands("-12345"), "-12,345");
    }

    #[test]
    fn test_formatters() {
        assert_eq!(format_percentage(dec!(75)), "75.00%");
        assert_eq!(format_percentage(dec!(12.345)), "12.35%");
        assert_eq!(format_token_amount(dec!(100), "OPN"), "100.00 OPN");
        assert_eq!(format_token_amount(dec!(1234.5), "OPN"), "1,234.50 OPN");
        assert_eq!(format_shares(1_000_000), "1,000,000");
        assert_eq!(format_usd(dec!(5)), "$5.00");
        assert_eq!(format_usd(dec!(-2.5)), "-$2.50");
    }

    #[test]
    fn test_usd_estimate() {
        assert_eq!(usd_estimate(dec!(100), dec!(0.05)), dec!(5));
        assert_eq!(usd_estimate(Decimal::MAX, dec!(2)), Decimal::ZERO);
    }

    #[test]
    fn test_gateway_url() {
        assert_eq!(
            gateway_url("https://gateway.pinata.cloud/ipfs/", "ipfs://QmHash"),
            "https://gateway.pinata.cloud/ipfs/QmHash"
        );
    }
}
