//! Number formatting and the cached stats header.

use super::config::SUNDAE_MULTIPLIER_VALUE;

const SUFFIXES: [&str; 5] = ["", "k", "M", "B", "T"];

/// Short human-readable number: `12.5`, `1.5k`, `130k`, `2.47M`, `1.00e15`.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "0".to_string();
    }
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }

    let one_decimal = (n * 10.0).round() / 10.0;
    if one_decimal < 1000.0 {
        return trim_zeros(format!("{:.1}", one_decimal));
    }
    if n >= 1e15 {
        return format!("{:.2e}", n);
    }

    let mut tier = 0;
    let mut scaled = n;
    while scaled >= 1000.0 && tier < SUFFIXES.len() - 1 {
        scaled /= 1000.0;
        tier += 1;
    }
    let mut digits = three_significant(scaled);
    // 999.6k rounds up into the next tier
    if digits.parse::<f64>().unwrap_or(0.0) >= 1000.0 {
        tier += 1;
        if tier >= SUFFIXES.len() {
            return format!("{:.2e}", n);
        }
        digits = three_significant(scaled / 1000.0);
    }
    format!("{}{}", digits, SUFFIXES[tier])
}

fn three_significant(v: f64) -> String {
    let s = if v < 10.0 {
        format!("{:.2}", v)
    } else if v < 100.0 {
        format!("{:.1}", v)
    } else {
        format!("{:.0}", v)
    };
    trim_zeros(s)
}

fn trim_zeros(s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Header texts, reformatted only when the displayed value would change.
#[derive(Default)]
pub struct StatsDisplay {
    banked_shown: Option<f64>,
    lifetime_shown: Option<f64>,
    sps_shown: Option<(f64, bool)>,
    pub banked: String,
    pub lifetime: String,
    pub sps: String,
    #[cfg(test)]
    revision: u64,
}

impl StatsDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, banked: f64, lifetime: f64, sps: f64, multiplier_active: bool) {
        let banked = banked.floor();
        if self.banked_shown != Some(banked) {
            self.banked = format_number(banked);
            self.banked_shown = Some(banked);
            self.reformatted();
        }

        let lifetime = lifetime.floor();
        if self.lifetime_shown != Some(lifetime) {
            self.lifetime = format_number(lifetime);
            self.lifetime_shown = Some(lifetime);
            self.reformatted();
        }

        if self.sps_shown != Some((sps, multiplier_active)) {
            self.sps = if multiplier_active {
                format!("{} (x{}!)", format_number(sps), SUNDAE_MULTIPLIER_VALUE)
            } else {
                format_number(sps)
            };
            self.sps_shown = Some((sps, multiplier_active));
            self.reformatted();
        }
    }

    fn reformatted(&mut self) {
        #[cfg(test)]
        {
            self.revision += 1;
        }
    }
}
