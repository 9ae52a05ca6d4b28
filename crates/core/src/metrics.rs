//! Lead aggregator - derived dashboard metrics
//!
//! Pure counting over a lead slice. The leads arrive pre-filtered to the
//! active project/campaign by the fetch query, so nothing here re-filters;
//! every function is deterministic and independent of input order.

use chrono::Timelike;
use launchbi_domain::constants::{
    DEVICE_DESKTOP, GENDER_FEMALE, GENDER_MALE, INCOME_TARGET_RANGE, SRC_ADS, SRC_PLAYER,
};
use launchbi_domain::{
    DashboardMetrics, DeviceSplit, GenderBreakdown, IncomeBreakdown, Lead, TrafficSplit,
};

/// Count of all records, duplicates included.
pub fn total(leads: &[Lead]) -> u32 {
    leads.len() as u32
}

/// Records whose qualification judgment is truthy.
pub fn qualified_count(leads: &[Lead]) -> u32 {
    leads.iter().filter(|l| l.qualificado).count() as u32
}

/// Records that answered the survey (age or gender present).
pub fn respondent_count(leads: &[Lead]) -> u32 {
    leads.iter().filter(|l| l.is_respondent()).count() as u32
}

/// `respondents / total * 100`, one fraction digit.
///
/// Zero when there are no leads; the division is always guarded.
pub fn response_rate(leads: &[Lead]) -> f64 {
    let total = total(leads);
    if total == 0 {
        return 0.0;
    }
    round1(f64::from(respondent_count(leads)) / f64::from(total) * 100.0)
}

/// Exact-match gender buckets; any other or absent answer lands in neither.
pub fn gender_distribution(leads: &[Lead]) -> GenderBreakdown {
    let mut breakdown = GenderBreakdown::default();
    for lead in leads {
        match lead.sexo.as_deref() {
            Some(GENDER_MALE) => breakdown.masculino += 1,
            Some(GENDER_FEMALE) => breakdown.feminino += 1,
            _ => {}
        }
    }
    breakdown
}

/// Income buckets: answers containing the target range substring vs. every
/// other answered range. Unanswered records count in neither bucket.
pub fn income_buckets(leads: &[Lead]) -> IncomeBreakdown {
    let mut breakdown = IncomeBreakdown::default();
    for lead in leads {
        if let Some(renda) = &lead.renda_mensal {
            if renda.contains(INCOME_TARGET_RANGE) {
                breakdown.faixa_2_a_5 += 1;
            } else {
                breakdown.outros += 1;
            }
        }
    }
    breakdown
}

/// Exact-match traffic-source split (paid ads vs. organic player).
pub fn traffic_source_split(leads: &[Lead]) -> TrafficSplit {
    let mut split = TrafficSplit::default();
    for lead in leads {
        match lead.src.as_deref() {
            Some(SRC_ADS) => split.ads += 1,
            Some(SRC_PLAYER) => split.player += 1,
            _ => {}
        }
    }
    split
}

/// Desktop captures vs. everything else.
pub fn device_split(leads: &[Lead]) -> DeviceSplit {
    let desktop = leads
        .iter()
        .filter(|l| l.dispositivo.as_deref().is_some_and(|d| d.eq_ignore_ascii_case(DEVICE_DESKTOP)))
        .count() as u32;
    DeviceSplit { desktop, mobile: total(leads) - desktop }
}

/// Leads per UTC hour of capture; records without a timestamp are not
/// counted.
pub fn hourly_histogram(leads: &[Lead]) -> [u32; 24] {
    let mut buckets = [0u32; 24];
    for lead in leads {
        if let Some(created_at) = lead.created_at {
            buckets[created_at.hour() as usize] += 1;
        }
    }
    buckets
}

/// `investment / total`, two fraction digits.
///
/// With zero leads the division is skipped and the raw investment comes
/// back, so the card never renders a division artifact.
pub fn cost_per_lead(investment: f64, total: u32) -> f64 {
    if total == 0 {
        return round2(investment);
    }
    round2(investment / f64::from(total))
}

/// Bundle every derived metric for one selection.
pub fn dashboard(leads: &[Lead], investment: f64) -> DashboardMetrics {
    let total = total(leads);
    DashboardMetrics {
        total,
        qualified: qualified_count(leads),
        respondents: respondent_count(leads),
        response_rate: response_rate(leads),
        gender: gender_distribution(leads),
        income: income_buckets(leads),
        traffic: traffic_source_split(leads),
        devices: device_split(leads),
        hourly: hourly_histogram(leads),
        investment,
        cost_per_lead: cost_per_lead(investment, total),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
