//! The built-in table of normal sinus rhythm plus clinical conditions.

use crate::catalog::{ConditionCatalog, ConditionProfile};
use crate::types::{ComponentDelta, ParameterDeltas, RhythmMode, WaveName};

use crate::types::AlertRegion::{Pr, Qrs, Qt, St};
use crate::types::Lead::{AVF, AVL, I, II, III, V1, V2, V3, V4, V5, V6};

fn deltas(entries: &[(WaveName, ComponentDelta)]) -> ParameterDeltas {
    entries
        .iter()
        .fold(ParameterDeltas::new(), |acc, &(name, delta)| acc.with(name, delta))
}

pub(super) fn builtin_catalog() -> ConditionCatalog {
    let mut catalog = ConditionCatalog::new();

    catalog.insert("normal", ConditionProfile::new("Normal Sinus Rhythm", 72.0));
    catalog.insert("sinus_brady", ConditionProfile::new("Sinus Bradycardia", 45.0));
    catalog.insert(
        "sinus_tachy",
        ConditionProfile::new("Sinus Tachycardia", 130.0).with_deltas(deltas(&[(
            WaveName::T,
            ComponentDelta::offset(0.25),
        )])),
    );

    // Conduction disorders
    catalog.insert(
        "first_degree_block",
        ConditionProfile::new("First-Degree AV Block", 68.0)
            .with_deltas(deltas(&[(WaveName::P, ComponentDelta::offset(-0.32))]))
            .with_alerts(&[Pr]),
    );
    catalog.insert(
        "mobitz2",
        ConditionProfile::new("Second-Degree AV Block (Mobitz II)", 60.0)
            .with_rhythm(RhythmMode::Mobitz2Block),
    );
    catalog.insert(
        "complete_block",
        ConditionProfile::new("Third-Degree (Complete) AV Block", 38.0)
            .with_rhythm(RhythmMode::CompleteBlock)
            .with_deltas(deltas(&[
                (WaveName::R, ComponentDelta::amplitude(0.9).with_width(0.018)),
                (WaveName::S, ComponentDelta::amplitude(-0.3).with_width(0.018)),
            ])),
    );
    catalog.insert(
        "lbbb",
        ConditionProfile::new("Left Bundle Branch Block", 75.0)
            .with_deltas(deltas(&[
                (WaveName::Q, ComponentDelta::amplitude(0.0)),
                (WaveName::R, ComponentDelta::full(0.9, 0.015, 0.03)),
                (WaveName::S, ComponentDelta::amplitude(-0.1)),
                (WaveName::St, ComponentDelta::amplitude(-0.1)),
                (WaveName::T, ComponentDelta::amplitude(-0.2)),
            ]))
            .with_alerts(&[Qrs]),
    );
    catalog.insert(
        "rbbb",
        ConditionProfile::new("Right Bundle Branch Block", 75.0)
            .with_deltas(deltas(&[
                (WaveName::S, ComponentDelta::full(0.45, 0.06, 0.015)),
                (WaveName::T, ComponentDelta::amplitude(-0.1)),
            ]))
            .with_alerts(&[Qrs]),
    );
    catalog.insert(
        "wpw",
        ConditionProfile::new("Wolff-Parkinson-White", 80.0)
            .with_deltas(deltas(&[
                (WaveName::P, ComponentDelta::offset(-0.12)),
                (WaveName::Q, ComponentDelta::full(0.15, -0.04, 0.02)),
            ]))
            .with_alerts(&[Pr, Qrs]),
    );

    // Tachyarrhythmias
    catalog.insert(
        "afib",
        ConditionProfile::new("Atrial Fibrillation", 110.0).with_rhythm(RhythmMode::AtrialFibrillation),
    );
    catalog.insert(
        "aflutter",
        ConditionProfile::new("Atrial Flutter (4:1)", 75.0).with_rhythm(RhythmMode::AtrialFlutter),
    );
    catalog.insert(
        "vtach",
        ConditionProfile::new("Ventricular Tachycardia", 170.0)
            .with_rhythm(RhythmMode::VentricularTachycardia)
            .with_deltas(deltas(&[
                (WaveName::Q, ComponentDelta::amplitude(0.0)),
                (WaveName::R, ComponentDelta::amplitude(1.4).with_width(0.035)),
                (WaveName::S, ComponentDelta::full(-0.6, 0.08, 0.03)),
                (WaveName::T, ComponentDelta::full(-0.4, 0.3, 0.07)),
            ]))
            .with_alerts(&[Qrs]),
    );
    catalog.insert(
        "vfib",
        ConditionProfile::new("Ventricular Fibrillation", 300.0)
            .with_rhythm(RhythmMode::VentricularFibrillation),
    );
    catalog.insert(
        "torsades",
        ConditionProfile::new("Torsades de Pointes", 220.0)
            .with_rhythm(RhythmMode::Torsades)
            .with_deltas(deltas(&[
                (WaveName::P, ComponentDelta::amplitude(0.0)),
                (WaveName::Q, ComponentDelta::amplitude(0.0)),
                (WaveName::R, ComponentDelta::amplitude(0.0)),
                (WaveName::S, ComponentDelta::amplitude(0.0)),
                (WaveName::T, ComponentDelta::amplitude(0.0)),
            ])),
    );

    // Ischemia and infarction
    catalog.insert(
        "stemi_ant",
        ConditionProfile::new("Anterior STEMI", 90.0).with_st_elevation(
            &[V1, V2, V3, V4],
            0.5,
            Some(0.4),
        ),
    );
    catalog.insert(
        "stemi_inf",
        ConditionProfile::new("Inferior STEMI", 80.0)
            .with_st_elevation(&[II, III, AVF], 0.4, Some(0.35))
            .with_st_depression(&[I, AVL], -0.15, Some(0.1)),
    );
    catalog.insert(
        "stemi_lat",
        ConditionProfile::new("Lateral STEMI", 85.0)
            .with_st_elevation(&[I, AVL, V5, V6], 0.35, Some(0.35))
            .with_st_depression(&[III, AVF], -0.12, None),
    );
    catalog.insert(
        "ischemia",
        ConditionProfile::new("Subendocardial Ischemia", 95.0).with_st_depression(
            &[I, II, V4, V5, V6],
            -0.15,
            Some(0.1),
        ),
    );
    catalog.insert(
        "pericarditis",
        ConditionProfile::new("Acute Pericarditis", 100.0)
            .with_deltas(deltas(&[(WaveName::St, ComponentDelta::amplitude(0.25))]))
            .with_alerts(&[St, Pr]),
    );

    // Electrolytes and drugs
    catalog.insert(
        "hyperkalemia",
        ConditionProfile::new("Hyperkalemia", 70.0)
            .with_deltas(deltas(&[
                (WaveName::P, ComponentDelta::amplitude(0.05)),
                (WaveName::R, ComponentDelta::amplitude(0.8).with_width(0.014)),
                (WaveName::T, ComponentDelta::full(0.75, 0.26, 0.03)),
            ]))
            .with_alerts(&[Qrs]),
    );
    catalog.insert(
        "hypokalemia",
        ConditionProfile::new("Hypokalemia", 75.0)
            .with_deltas(deltas(&[
                (WaveName::St, ComponentDelta::amplitude(-0.08)),
                (WaveName::T, ComponentDelta::amplitude(0.08)),
            ]))
            .with_alerts(&[St, Qt]),
    );
    catalog.insert(
        "hypercalcemia",
        ConditionProfile::new("Hypercalcemia", 72.0)
            .with_deltas(deltas(&[(WaveName::T, ComponentDelta::offset(0.22))]))
            .with_alerts(&[Qt]),
    );
    catalog.insert(
        "hypocalcemia",
        ConditionProfile::new("Hypocalcemia", 72.0)
            .with_deltas(deltas(&[
                (WaveName::St, ComponentDelta::offset(0.22)),
                (WaveName::T, ComponentDelta::offset(0.42)),
            ]))
            .with_alerts(&[Qt]),
    );
    catalog.insert(
        "digoxin",
        ConditionProfile::new("Digoxin Effect", 65.0)
            .with_deltas(deltas(&[
                (WaveName::St, ComponentDelta::full(-0.18, 0.16, 0.06)),
                (WaveName::T, ComponentDelta::amplitude(0.1)),
            ]))
            .with_alerts(&[St]),
    );
    catalog.insert(
        "long_qt",
        ConditionProfile::new("Long QT Syndrome", 65.0)
            .with_deltas(deltas(&[(
                WaveName::T,
                ComponentDelta::offset(0.45).with_width(0.07),
            )]))
            .with_alerts(&[Qt]),
    );

    catalog
}
