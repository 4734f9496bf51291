//! Lowering: claim records to an IR module.
//!
//! Lowering runs in two stages. Resolution turns one raw record into a
//! [`ClaimOutcome`]; it is pure and may run on the worker pool. Assembly
//! then walks the outcomes in input order, registering entities and
//! allocating result symbols, so the emitted text does not depend on the
//! number of workers.

mod pool;
mod registry;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::claim::{load_claims, ClaimKind, ClaimRecord, EvidenceRecord, DEFAULT_SOURCE_KIND};
use crate::config::LoweringConfig;
use crate::entity::Entity;
use crate::error::{ClaimError, ScienceResult};
use crate::ir::{ContextAttr, EvidenceAttr, IrModule, IrType, OpKind, Operation, Symbol, TypeSignature, UNKNOWN};

pub use registry::EntityRegistry;

/// A claim ready for assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedClaim {
    pub kind: OpKind,
    /// Operands in order: enzyme/substrate, agent/target, or complex members.
    pub participants: Vec<Entity>,
    pub site: Option<String>,
    pub context: ContextAttr,
    pub evidence: EvidenceAttr,
}

/// Result of resolving one record.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimOutcome {
    Ready(ResolvedClaim),
    /// A required participant is missing; skipped without a warning.
    Incomplete(ClaimKind),
    /// The record's type is not lowered.
    Unsupported(String),
    Malformed(ClaimError),
}

/// Resolves one raw record. Pure: touches no shared state.
#[must_use]
pub fn resolve_claim(value: &Value) -> ClaimOutcome {
    let record = match ClaimRecord::from_value(value) {
        Ok(record) => record,
        Err(ClaimError::Unsupported { kind }) => return ClaimOutcome::Unsupported(kind),
        Err(e) => return ClaimOutcome::Malformed(e),
    };
    match resolve_record(&record) {
        Ok(Some(claim)) => ClaimOutcome::Ready(claim),
        Ok(None) => ClaimOutcome::Incomplete(record.kind()),
        Err(e) => ClaimOutcome::Malformed(e),
    }
}

fn resolve_record(record: &ClaimRecord) -> Result<Option<ResolvedClaim>, ClaimError> {
    let (participants, site) = match record {
        ClaimRecord::Phosphorylation {
            enz,
            sub,
            residue,
            position,
            ..
        } => {
            let (Some(enz), Some(sub)) = (enz, sub) else {
                return Ok(None);
            };
            let site = match (residue.as_deref(), position.as_deref()) {
                (Some(r), Some(p)) if !r.is_empty() && !p.is_empty() => format!("{r}{p}"),
                _ => UNKNOWN.to_string(),
            };
            (vec![enz.to_entity(), sub.to_entity()], Some(site))
        }
        ClaimRecord::Activation { subj, obj, .. } | ClaimRecord::Inhibition { subj, obj, .. } => {
            let (Some(subj), Some(obj)) = (subj, obj) else {
                return Ok(None);
            };
            (vec![subj.to_entity(), obj.to_entity()], None)
        }
        ClaimRecord::Complex { members, .. } => {
            let members: Vec<Entity> = members.iter().flatten().map(|m| m.to_entity()).collect();
            if members.len() < 2 {
                return Ok(None);
            }
            (members, None)
        }
    };

    for entity in &participants {
        entity.symbol()?;
    }

    Ok(Some(ResolvedClaim {
        kind: record.kind().op_kind(),
        participants,
        site,
        context: context_from(record.evidence()),
        evidence: evidence_from(record.evidence())?,
    }))
}

/// Context from every evidence entry, duplicates collapsed.
fn context_from(entries: &[EvidenceRecord]) -> ContextAttr {
    let mut ctx = ContextAttr::new();
    for ev in entries {
        if let Some(cell) = ev.cell_type() {
            ctx.push(ContextAttr::CELL_TYPE, cell);
        }
        if let Some(organism) = ev.organism() {
            ctx.push(ContextAttr::ORGANISM, organism);
        }
    }
    ctx
}

/// Evidence from the first entry only.
fn evidence_from(entries: &[EvidenceRecord]) -> Result<EvidenceAttr, ClaimError> {
    let Some(first) = entries.first() else {
        return Ok(EvidenceAttr::unattested());
    };
    Ok(EvidenceAttr {
        source_id: first.pmid.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        record_id: first.source_id.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        confidence: first.confidence()?,
        source_kind: Some(
            first
                .source_api
                .clone()
                .unwrap_or_else(|| DEFAULT_SOURCE_KIND.to_string()),
        ),
    })
}

/// A record that could not be lowered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MalformedClaim {
    /// Position of the record in the input.
    pub index: usize,
    pub message: String,
}

/// Counters for one lowering run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoweringReport {
    pub claims_seen: usize,
    pub operations: usize,
    pub declarations: usize,
    pub incomplete: usize,
    pub unsupported: usize,
    pub malformed: Vec<MalformedClaim>,
}

impl LoweringReport {
    /// Records that were dropped for any reason.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.incomplete + self.unsupported + self.malformed.len()
    }
}

/// A lowered module and its report.
#[derive(Debug, Clone)]
pub struct LoweredModule {
    pub module: IrModule,
    pub report: LoweringReport,
}

impl LoweredModule {
    /// The IR text handed to downstream passes.
    #[must_use]
    pub fn text(&self) -> String {
        self.module.render()
    }
}

/// Incremental lowering state for one module.
#[derive(Debug)]
pub struct Lowering {
    config: LoweringConfig,
    module: IrModule,
    registry: EntityRegistry,
    report: LoweringReport,
    next_result: u64,
}

impl Lowering {
    #[must_use]
    pub fn new(config: LoweringConfig) -> Self {
        Self {
            config,
            module: IrModule::new(),
            registry: EntityRegistry::new(),
            report: LoweringReport::default(),
            next_result: 1,
        }
    }

    /// Lowers a batch of raw records, appending to the module.
    pub fn lower_records(&mut self, records: &[Value]) {
        let outcomes = pool::map_ordered(
            records,
            self.config.workers,
            self.config.queue_capacity,
            resolve_claim,
        );
        let base = self.report.claims_seen;
        for (offset, outcome) in outcomes.into_iter().enumerate() {
            self.apply(base + offset, outcome);
        }
    }

    fn apply(&mut self, index: usize, outcome: ClaimOutcome) {
        self.report.claims_seen += 1;
        match outcome {
            ClaimOutcome::Ready(claim) => {
                if let Err(e) = self.assemble(claim) {
                    error!(index, error = %e, "failed to lower claim");
                    self.report.malformed.push(MalformedClaim {
                        index,
                        message: e.to_string(),
                    });
                }
            }
            ClaimOutcome::Incomplete(kind) => {
                debug!(index, kind = %kind, "claim is missing a participant");
                self.report.incomplete += 1;
            }
            ClaimOutcome::Unsupported(kind) => {
                warn!(index, kind = %kind, "unsupported claim type");
                self.report.unsupported += 1;
            }
            ClaimOutcome::Malformed(e) => {
                error!(index, error = %e, "malformed claim");
                self.report.malformed.push(MalformedClaim {
                    index,
                    message: e.to_string(),
                });
            }
        }
    }

    fn assemble(&mut self, claim: ResolvedClaim) -> ScienceResult<()> {
        let operands = claim
            .participants
            .iter()
            .map(|entity| self.registry.register(entity, &mut self.module))
            .collect::<Result<Vec<_>, _>>()?;

        let inputs: Vec<IrType> = claim.participants.iter().map(Entity::type_descriptor).collect();
        let output = match claim.kind {
            OpKind::Phosphorylate | OpKind::Activate => inputs[1].clone(),
            OpKind::Inhibit => IrType::inhibited_state(),
            OpKind::Bind => IrType::complex(),
        };
        let result = self.result_symbol(claim.kind, &claim.participants);

        debug!(result = %result, kind = %claim.kind, "lowered claim");
        self.module.push_operation(Operation {
            result,
            kind: claim.kind,
            operands,
            site: claim.site,
            context: claim.context,
            evidence: claim.evidence,
            signature: TypeSignature { inputs, output },
        })?;
        self.report.operations += 1;
        Ok(())
    }

    /// `%phospho_<sub>_<n>`, `%activated_<obj>_<n>`, `%inhibited_state_<n>`
    /// or `%complex_<n>`, with `n` unique within the module.
    fn result_symbol(&mut self, kind: OpKind, participants: &[Entity]) -> Symbol {
        let n = self.next_result;
        self.next_result += 1;
        let target = || {
            Symbol::sanitized(&participants[1].name)
                .map_or_else(|| "entity".to_string(), |s| s.as_str().to_string())
        };
        let body = match kind {
            OpKind::Phosphorylate => format!("phospho_{}_{n}", target()),
            OpKind::Activate => format!("activated_{}_{n}", target()),
            OpKind::Inhibit => format!("inhibited_state_{n}"),
            OpKind::Bind => format!("complex_{n}"),
        };
        Symbol::from_raw(body)
    }

    /// Finishes the run and logs its summary.
    #[must_use]
    pub fn finish(mut self) -> LoweredModule {
        self.report.declarations = self.module.declarations().len();
        info!(
            claims = self.report.claims_seen,
            operations = self.report.operations,
            declarations = self.report.declarations,
            skipped = self.report.skipped(),
            "lowering complete"
        );
        LoweredModule {
            module: self.module,
            report: self.report,
        }
    }
}

/// Lowers raw records into a module.
#[must_use]
pub fn lower_claims(records: &[Value], config: &LoweringConfig) -> LoweredModule {
    let mut lowering = Lowering::new(config.clone());
    lowering.lower_records(records);
    lowering.finish()
}

/// Lowers a claims JSON document (an array, or an object with `statements`).
///
/// # Errors
///
/// Returns `ScienceError::InvalidInput` if the document is not valid JSON
/// of either shape. Individual bad records never fail the run.
pub fn lower_document(text: &str, config: &LoweringConfig) -> ScienceResult<LoweredModule> {
    let records = load_claims(text)?;
    info!(claims = records.len(), "loaded claims");
    Ok(lower_claims(&records, config))
}
