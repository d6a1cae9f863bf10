//! Satoshi amounts rendered as BTC text

use crate::constants::SATOSHIS_PER_BTC;

/// BTC value of `satoshis` with trailing zeros stripped: `10000` -> `"0.0001"`
pub fn format_value(satoshis: i64) -> String {
    let sign = if satoshis < 0 { "-" } else { "" };
    let magnitude = satoshis.unsigned_abs();
    let per_btc = SATOSHIS_PER_BTC as u64;
    let whole = magnitude / per_btc;
    let fraction = magnitude % per_btc;
    if fraction == 0 {
        return format!("{}{}", sign, whole);
    }
    let digits = format!("{:08}", fraction);
    format!("{}{}.{}", sign, whole, digits.trim_end_matches('0'))
}
