use serde_json::{json, Value};

use science_ir::config::PipelineConfig;
use science_ir::ir::parse_document;
use science_ir::lower::lower_claims;
use science_ir::simulation::{generate, ReactionModel};
use science_ir::verify::{verify, Location, Severity};
use science_ir::OpKind;

fn agent(name: &str, up: &str) -> Value {
    json!({"name": name, "db_refs": {"UP": up}})
}

fn lower_text(records: &[Value]) -> String {
    lower_claims(records, &PipelineConfig::default().lowering).text()
}

#[test]
fn phosphorylation_scenario_end_to_end() {
    let config = PipelineConfig::default();
    let claim = json!({
        "type": "Phosphorylation",
        "enz": agent("X", "Q1"),
        "sub": agent("Y", "Q2"),
        "residue": "S",
        "position": "15",
        "evidence": []
    });

    let lowered = lower_claims(&[claim], &config.lowering);
    let text = lowered.text();
    let decls = lowered.module.declarations();
    assert_eq!(decls.len(), 2);
    assert_eq!(decls[0].ty.to_string(), "!science.protein<Q1>");
    assert_eq!(decls[1].ty.to_string(), "!science.protein<Q2>");
    let op = &lowered.module.operations()[0];
    assert_eq!(op.kind, OpKind::Phosphorylate);
    assert_eq!(op.site.as_deref(), Some("S15"));
    assert_eq!(op.evidence.confidence, 0.5);
    assert_eq!(op.evidence.source_id, "unknown");

    let model = ReactionModel::parse(&text, &config.simulation.rates);
    assert!(model.diagnostics().is_empty());
    assert_eq!(model.species().len(), 2);
    assert_eq!(model.reactions().len(), 1);
    assert_eq!(model.reactions()[0].kind, OpKind::Phosphorylate);
    assert_eq!(model.reactions()[0].rate, 0.1);

    let program = generate(&model, &config.simulation).unwrap();
    assert!(program
        .source
        .contains("derivative[1] -= 0.1 * state[0] * state[1]"));

    let report = verify(&text, &config.verification);
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].severity, Severity::Info);
    assert_eq!(report.violations[0].message, "Low confidence: 0.5");
    assert_eq!(report.error_count(), 0);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.digest, lowered.module.fingerprint());
}

#[test]
fn identity_is_stable_across_claims() {
    let records = vec![
        json!({"type": "Activation", "subj": agent("TP53", "P04637"), "obj": agent("MDM2", "Q00987")}),
        json!({"type": "Inhibition", "subj": agent("p53", "P04637"), "obj": agent("MDM2", "Q00987")}),
    ];
    let text = lower_text(&records);
    let doc = parse_document(&text);
    assert_eq!(doc.declarations.len(), 2);
    assert_eq!(
        text.matches("%p04637 = constant !science.protein<P04637>").count(),
        1
    );
    assert_eq!(doc.operations[0].operands, doc.operations[1].operands);
}

#[test]
fn species_order_follows_first_declaration() {
    let records = vec![
        json!({"type": "Activation", "subj": agent("C", "P3"), "obj": agent("A", "P1")}),
        json!({"type": "Activation", "subj": agent("B", "P2"), "obj": agent("C", "P3")}),
    ];
    let text = lower_text(&records);
    let model = ReactionModel::parse(&text, &PipelineConfig::default().simulation.rates);
    let names: Vec<&str> = model.species().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["p3", "p1", "p2"]);
}

#[test]
fn contradiction_is_reported_once() {
    let records = vec![
        json!({"type": "Inhibition", "subj": agent("A", "P1"), "obj": agent("B", "P2")}),
        json!({"type": "Activation", "subj": agent("A", "P1"), "obj": agent("B", "P2")}),
        json!({"type": "Activation", "subj": agent("A", "P1"), "obj": agent("B", "P2")}),
    ];
    let report = verify(&lower_text(&records), &PipelineConfig::default().verification);
    let contradictions: Vec<_> = report
        .violations
        .iter()
        .filter(|v| v.location == Location::MultipleOps)
        .collect();
    assert_eq!(contradictions.len(), 1);
    assert_eq!(contradictions[0].severity, Severity::Warning);
    assert_eq!(contradictions[0].message, "%p1 both inhibits AND activates %p2");
}

#[test]
fn non_protein_kinase_fails_verification() {
    let records = vec![json!({
        "type": "Phosphorylation",
        "enz": {"name": "TP53", "db_refs": {"HGNC": "11998"}},
        "sub": agent("MDM2", "Q00987"),
        "residue": "S",
        "position": "166",
        "evidence": [{"pmid": "1", "epistemics": {"direct": 0.9}}]
    })];
    let report = verify(&lower_text(&records), &PipelineConfig::default().verification);
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].message, "Kinase must be protein");
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn round_trip_preserves_kind_order_and_confidence() {
    let records = vec![
        json!({"type": "Complex", "members": [agent("A", "P1"), agent("B", "P2"), agent("C", "P3")],
               "evidence": [{"pmid": "9", "epistemics": {"direct": 0.75}, "source_api": "sparser"}]}),
        json!({"type": "Inhibition", "subj": agent("C", "P3"), "obj": agent("A", "P1"),
               "evidence": [{"epistemics": {"direct": 0.25}}]}),
    ];
    let lowered = lower_claims(&records, &PipelineConfig::default().lowering);
    let doc = parse_document(&lowered.text());
    assert!(doc.diagnostics.is_empty());
    for (emitted, parsed) in lowered.module.operations().iter().zip(&doc.operations) {
        assert_eq!(emitted.kind, parsed.kind);
        assert_eq!(emitted.operands, parsed.operands);
        assert_eq!(Some(&emitted.evidence), parsed.evidence.as_ref());
        assert_eq!(Some(&emitted.context), parsed.context.as_ref());
        assert_eq!(Some(&emitted.signature), parsed.signature.as_ref());
    }
}

#[test]
fn hand_written_ir_with_junk_is_diagnosed_not_dropped() {
    let text = "\
module {
  %a = constant !science.protein<A>
  %b = constant !science.protein<B>
  %x = science.activate %a, %b {evidence = #science.evidence<\"1\", \"2\", 0.9>}
  %y = science.transcribe %a, %b
  garbage here
}
";
    let config = PipelineConfig::default();
    let model = ReactionModel::parse(text, &config.simulation.rates);
    assert_eq!(model.reactions().len(), 1);
    assert_eq!(model.diagnostics().len(), 2);

    let report = verify(text, &config.verification);
    assert_eq!(report.operations, 1);
    assert!(report.violations.is_empty());
    assert_eq!(report.diagnostics.len(), 2);
    assert_eq!(report.exit_code(), 0);
}
