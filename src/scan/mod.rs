//! Single-pass lexical scan of Clarity source
//!
//! One forward pass over the source lines builds the symbol tables
//! ([`ContractContext`]) and the flow profile ([`FlowProfile`]) together;
//! both need line-ordered context, so they cannot be split into separate
//! passes. This is deliberately not a parser: declaration forms and flow
//! signals are recognized textually, and several downstream rules rely on
//! that textual proximity ("same statement", "body text contains").

mod context;
mod flow;

pub use context::{ContractContext, FunctionEntry, SymbolEntry, TokenEntry, TokenKind};
pub use flow::{BranchRecord, FlowProfile, TransferRecord, WriteRecord};

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Errors that end a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Grouping balance, open conditionals or open loops were nonzero at
    /// end of input. The contract is malformed; no partial findings are
    /// reported over it.
    #[error("unbalanced contract structure")]
    StructuralImbalance,
}

/// Everything one scan produced, handed as a unit to the detection rules.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// The sanitized source the scan ran over.
    pub source: String,
    pub lines: Vec<String>,
    pub context: ContractContext,
    pub flow: FlowProfile,
}

impl ScanOutcome {
    /// Text from the line after `line` up to the next `;` (the comment
    /// marker doubles as the statement horizon for proximity rules).
    pub fn statement_after(&self, line: u32) -> String {
        let rest = match self.lines.get(line as usize..) {
            Some(tail) => tail.join("\n"),
            None => String::new(),
        };
        rest.split(';').next().unwrap_or("").to_string()
    }

    /// The function's body text: every line after the declaration through
    /// the line where nesting returned to the declaration baseline. Empty
    /// for single-line functions.
    pub fn body_text(&self, func: &FunctionEntry) -> String {
        let start = func.line as usize;
        let end = (func.body_end as usize).min(self.lines.len());
        if end <= start {
            return String::new();
        }
        self.lines[start..end].join("\n")
    }

    /// Like [`Self::body_text`] but including the declaration line, so
    /// single-line functions still expose their inline checks.
    pub fn function_scope(&self, func: &FunctionEntry) -> String {
        let start = (func.line as usize).saturating_sub(1);
        let end = (func.body_end as usize).min(self.lines.len()).max(start + 1);
        self.lines[start..end].join("\n")
    }
}

struct ScanPatterns {
    map_decl: Regex,
    var_decl: Regex,
    func_decl: Regex,
    trait_decl: Regex,
    const_decl: Regex,
    token_decl: Regex,
    readonly_decl: Regex,
    call_target: Regex,
    transfer_call: Regex,
    write_op: Regex,
    principal_ref: Regex,
    principal_lit: Regex,
    overflow_add: Regex,
    overflow_mul: Regex,
    print_stmt: Regex,
    print_event_name: Regex,
    emit_event_name: Regex,
    deploy_name: Regex,
}

fn patterns() -> &'static ScanPatterns {
    static PATTERNS: OnceLock<ScanPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| ScanPatterns {
        map_decl: Regex::new(r"^\(define-map\s+([\w?!-]+)").unwrap(),
        var_decl: Regex::new(r"^\(define-data-var\s+([\w?!-]+)").unwrap(),
        func_decl: Regex::new(r"^\(define-(public|private)\s+\(([\w?!-]+)").unwrap(),
        trait_decl: Regex::new(r"^\(define-trait\s+([\w?!-]+)").unwrap(),
        const_decl: Regex::new(r"^\(define-constant\s+([\w?!-]+)").unwrap(),
        token_decl: Regex::new(r"^\(define-(fungible|non-fungible)-token\s+([\w?!-]+)").unwrap(),
        readonly_decl: Regex::new(r"^\(define-read-only\s+\(([\w?!-]+)").unwrap(),
        call_target: Regex::new(r"contract-call\?\s*\.(\S+)").unwrap(),
        transfer_call: Regex::new(
            r"contract-call\?[^;]*?(stx-transfer\?|ft-transfer\?|nft-transfer\?)",
        )
        .unwrap(),
        write_op: Regex::new(r"var-set|map-set").unwrap(),
        principal_ref: Regex::new(r"principal|tx-sender|contract-caller").unwrap(),
        principal_lit: Regex::new(r"principal\s+'[^']+'").unwrap(),
        overflow_add: Regex::new(r"\+\s*[^(u]").unwrap(),
        overflow_mul: Regex::new(r"\*\s*[^(u]").unwrap(),
        print_stmt: Regex::new(r"print\s").unwrap(),
        print_event_name: Regex::new(r"print\s+\((\w+)").unwrap(),
        emit_event_name: Regex::new(r"emit-event\s+([\w?!-]+)").unwrap(),
        deploy_name: Regex::new(r"deploy-contract\s+([\w?!-]+)").unwrap(),
    })
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | '?' | '!')
}

/// True when `keyword` appears in application position (`(keyword` followed
/// by a non-identifier character). Distinguishes `(map f xs)` from
/// `map-set` and `define-map`.
fn has_application(line: &str, keyword: &str) -> bool {
    let needle = format!("({keyword}");
    let mut start = 0;
    while let Some(pos) = line[start..].find(&needle) {
        let end = start + pos + needle.len();
        match line[end..].chars().next() {
            Some(c) if is_ident_char(c) => {
                start = end;
            }
            _ => return true,
        }
    }
    false
}

/// True when `name` appears on the line as a whitespace-preceded token
/// (argument position), not as a fragment of a longer identifier.
fn references_symbol(line: &str, name: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = line[start..].find(name) {
        let abs = start + pos;
        let before_ok = line[..abs].chars().last().is_some_and(char::is_whitespace);
        let after_ok = line[abs + name.len()..]
            .chars()
            .next()
            .map_or(true, |c| !is_ident_char(c));
        if before_ok && after_ok {
            return true;
        }
        start = abs + name.len();
    }
    false
}

/// Parameter count heuristic: open-paren groups on the declaration line
/// minus the two structural ones (the define form and the name group).
/// Exact for flat Clarity signatures.
fn param_count(line: &str) -> usize {
    line.matches('(').count().saturating_sub(2)
}

struct OpenFunction {
    name: String,
    baseline: i64,
}

/// Run the single forward pass over sanitized source.
pub fn scan(source: &str) -> Result<ScanOutcome, ScanError> {
    let p = patterns();
    let lines: Vec<String> = source.lines().map(str::to_string).collect();
    let mut ctx = ContractContext::default();
    let mut flow = FlowProfile::default();

    let mut balance: i64 = 0;
    let mut current: Option<OpenFunction> = None;
    // Baselines of open conditional / loop constructs; a construct closes
    // when the balance returns to the level it opened at.
    let mut cond_stack: Vec<i64> = Vec::new();
    let mut loop_stack: Vec<i64> = Vec::new();

    for (idx, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let lineno = (idx + 1) as u32;
        let opens = line.matches('(').count() as i64;
        let closes = line.matches(')').count() as i64;
        let entry_balance = balance;
        balance += opens - closes;

        // Declaration forms. Redeclarations keep the first entry.
        if let Some(c) = p.map_decl.captures(line) {
            ctx.maps
                .entry(c[1].to_string())
                .or_insert_with(|| SymbolEntry::new(lineno));
        } else if let Some(c) = p.var_decl.captures(line) {
            ctx.vars
                .entry(c[1].to_string())
                .or_insert_with(|| SymbolEntry::new(lineno));
        } else if let Some(c) = p.func_decl.captures(line) {
            let name = c[2].to_string();
            let public = &c[1] == "public";
            ctx.funcs
                .entry(name.clone())
                .or_insert_with(|| FunctionEntry::new(lineno, public, param_count(line)));
            current = Some(OpenFunction {
                name,
                baseline: entry_balance,
            });
        } else if let Some(c) = p.trait_decl.captures(line) {
            ctx.traits
                .entry(c[1].to_string())
                .or_insert_with(|| SymbolEntry::new(lineno));
        } else if let Some(c) = p.const_decl.captures(line) {
            ctx.constants
                .entry(c[1].to_string())
                .or_insert_with(|| SymbolEntry::new(lineno));
        } else if let Some(c) = p.token_decl.captures(line) {
            let kind = if &c[1] == "fungible" {
                TokenKind::Fungible
            } else {
                TokenKind::NonFungible
            };
            ctx.tokens.entry(c[2].to_string()).or_insert(TokenEntry {
                line: lineno,
                kind,
                used: false,
            });
        } else if let Some(c) = p.readonly_decl.captures(line) {
            ctx.read_only
                .entry(c[1].to_string())
                .or_insert_with(|| SymbolEntry::new(lineno));
        }
        if line.starts_with("(define-post-condition") {
            ctx.post_conditions += 1;
        }

        // External calls.
        if line.contains("contract-call?") {
            if let Some(c) = p.call_target.captures(line) {
                let target = c[1].to_string();
                if ctx.read_only.contains_key(&target) {
                    flow.read_only_calls += 1;
                }
                *ctx.call_targets.entry(target).or_insert(0) += 1;
            }
            if let Some(open) = &current {
                if let Some(f) = ctx.funcs.get_mut(&open.name) {
                    f.calls += 1;
                }
            }
            if line.contains("get-contracts-owned") || line.contains("dynamic") {
                flow.dynamic += 1;
            }
        }

        // State writes, tagged when the written value mentions the caller.
        if p.write_op.is_match(line) {
            flow.writes.push(WriteRecord {
                line: lineno,
                caller_derived: line.contains("tx-sender"),
            });
        }

        // Cross-contract value transfers, a separate list from plain calls.
        if p.transfer_call.is_match(line) {
            flow.transfers.push(TransferRecord { line: lineno });
        }

        // Branch-shaped constructs, recorded with the loop depth in effect
        // before any loop construct this same line opens.
        let is_cond = has_application(line, "if") || has_application(line, "match");
        let is_branch = is_cond
            || has_application(line, "fold")
            || has_application(line, "map")
            || has_application(line, "filter");
        if is_branch {
            flow.branches.push(BranchRecord {
                line: lineno,
                depth: loop_stack.len(),
            });
            if is_cond {
                flow.conds += 1;
                if balance > entry_balance {
                    cond_stack.push(entry_balance);
                }
            }
            if has_application(line, "fold") {
                flow.fold_ops += 1;
            }
        }

        // Loop-shaped constructs.
        if has_application(line, "fold")
            || has_application(line, "map")
            || has_application(line, "filter")
            || has_application(line, "begin")
            || has_application(line, "loop")
        {
            flow.loops += 1;
            if balance > entry_balance {
                loop_stack.push(entry_balance);
            }
        }

        // Close any constructs whose baseline the balance returned to.
        while cond_stack.last().is_some_and(|&b| balance <= b) {
            cond_stack.pop();
        }
        while loop_stack.last().is_some_and(|&b| balance <= b) {
            loop_stack.pop();
        }

        if line.contains("asserts!") {
            flow.asserts += 1;
        }

        if p.principal_ref.is_match(line) {
            flow.principals += 1;
            if let Some(m) = p.principal_lit.find(line) {
                *ctx
                    .principal_literals
                    .entry(m.as_str().to_string())
                    .or_insert(0) += 1;
            }
        }

        if p.overflow_add.is_match(line) || p.overflow_mul.is_match(line) {
            flow.overflows += 1;
        }

        if p.print_stmt.is_match(line) || line.contains("emit-event") {
            flow.event_emits += 1;
            let name = p
                .print_event_name
                .captures(line)
                .or_else(|| p.emit_event_name.captures(line))
                .map(|c| c[1].to_string());
            if let Some(n) = name {
                *ctx.events.entry(n).or_insert(0) += 1;
            }
        }

        if line.contains("deploy-contract") {
            flow.contract_creates += 1;
            if let Some(c) = p.deploy_name.captures(line) {
                *ctx.deployed.entry(c[1].to_string()).or_insert(0) += 1;
            }
        }

        if line.contains("block-height") || line.contains("at-block") {
            flow.block_access += 1;
        }

        if line.contains("as-contract") {
            flow.as_contract_uses += 1;
        }

        mark_usage(&mut ctx, line, lineno);

        // Function body closes when the balance returns to its baseline.
        // Checked after flow extraction so the closing line still counts
        // toward the function.
        if let Some(open) = &current {
            if balance <= open.baseline {
                if let Some(f) = ctx.funcs.get_mut(&open.name) {
                    f.body_end = lineno;
                }
                current = None;
            }
        }
    }

    if balance != 0 || !cond_stack.is_empty() || !loop_stack.is_empty() {
        debug!(
            balance,
            open_conds = cond_stack.len(),
            open_loops = loop_stack.len(),
            "scan aborted on unbalanced structure"
        );
        return Err(ScanError::StructuralImbalance);
    }

    // Stable sort by line so depth queries see line order; ties keep
    // encounter order.
    flow.branches.sort_by_key(|b| b.line);

    Ok(ScanOutcome {
        source: source.to_string(),
        lines,
        context: ctx,
        flow,
    })
}

/// Mark previously declared symbols referenced by this line. A symbol's own
/// declaration line never counts as a reference.
fn mark_usage(ctx: &mut ContractContext, line: &str, lineno: u32) {
    for (name, entry) in ctx.maps.iter_mut() {
        if entry.line != lineno && !entry.used && references_symbol(line, name) {
            entry.used = true;
        }
    }
    for (name, entry) in ctx.vars.iter_mut() {
        if entry.line != lineno && !entry.used && references_symbol(line, name) {
            entry.used = true;
        }
    }
    for (name, entry) in ctx.constants.iter_mut() {
        if entry.line != lineno && !entry.used && references_symbol(line, name) {
            entry.used = true;
        }
    }
    for (name, entry) in ctx.tokens.iter_mut() {
        if entry.line != lineno && !entry.used && references_symbol(line, name) {
            entry.used = true;
        }
    }
    for (name, entry) in ctx.traits.iter_mut() {
        if entry.line != lineno && !entry.used {
            let needle = format!("use-trait {name}");
            if let Some(pos) = line.find(&needle) {
                let after_ok = line[pos + needle.len()..]
                    .chars()
                    .next()
                    .map_or(true, |c| !is_ident_char(c));
                if after_ok {
                    entry.used = true;
                }
            }
        }
    }
    for (name, f) in ctx.funcs.iter_mut() {
        if f.line != lineno && has_application(line, name) {
            f.invoked += 1;
        }
    }
    for (name, entry) in ctx.read_only.iter_mut() {
        if entry.line != lineno && !entry.used && has_application(line, name) {
            entry.used = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN_CONTRACT: &str = r#"(define-map balances { owner: principal } { amount: uint })
(define-data-var total-supply uint u0)
(define-constant contract-owner tx-sender)
(define-public (transfer (amount uint) (recipient principal))
  (begin
    (asserts! (is-eq tx-sender contract-owner) (err u403))
    (map-set balances { owner: recipient } { amount: amount })
    (ok amount)))
(define-read-only (get-supply)
  (var-get total-supply))
"#;

    #[test]
    fn test_declarations_recognized() {
        let outcome = scan(TOKEN_CONTRACT).unwrap();
        let ctx = &outcome.context;
        assert!(ctx.maps.contains_key("balances"));
        assert!(ctx.vars.contains_key("total-supply"));
        assert!(ctx.constants.contains_key("contract-owner"));
        assert!(ctx.read_only.contains_key("get-supply"));
        let transfer = &ctx.funcs["transfer"];
        assert!(transfer.public);
        assert_eq!(transfer.line, 4);
        assert_eq!(transfer.params, 2);
    }

    #[test]
    fn test_function_body_bounds() {
        let outcome = scan(TOKEN_CONTRACT).unwrap();
        let transfer = &outcome.context.funcs["transfer"];
        assert_eq!(transfer.body_end, 8);
        let body = outcome.body_text(transfer);
        assert!(body.contains("asserts!"));
        assert!(body.contains("(ok amount)"));
        assert!(!body.contains("define-public"));
    }

    #[test]
    fn test_single_line_function_has_empty_body() {
        let src = "(define-public (noop) (ok true))";
        let outcome = scan(src).unwrap();
        let noop = &outcome.context.funcs["noop"];
        assert_eq!(noop.body_end, noop.line);
        assert_eq!(outcome.body_text(noop), "");
    }

    #[test]
    fn test_usage_marking_skips_declaration_line() {
        let outcome = scan(TOKEN_CONTRACT).unwrap();
        let ctx = &outcome.context;
        assert!(ctx.maps["balances"].used, "map-set references the map");
        assert!(ctx.vars["total-supply"].used, "var-get references the var");
        assert!(ctx.constants["contract-owner"].used);
        assert!(!ctx.read_only["get-supply"].used, "never called");
    }

    #[test]
    fn test_unreferenced_symbols_stay_unused() {
        let src = "(define-map orphan { id: uint } uint)\n(define-data-var lonely uint u0)\n(define-public (run)\n  (ok u1))";
        let ctx = scan(src).unwrap().context;
        assert!(!ctx.maps["orphan"].used);
        assert!(!ctx.vars["lonely"].used);
    }

    #[test]
    fn test_flow_counters() {
        let outcome = scan(TOKEN_CONTRACT).unwrap();
        let flow = &outcome.flow;
        assert_eq!(flow.asserts, 1);
        assert_eq!(flow.writes.len(), 1);
        assert!(!flow.writes[0].caller_derived);
        assert!(flow.principals >= 3);
        assert_eq!(flow.loops, 1, "one begin block");
        assert!(flow.transfers.is_empty());
    }

    #[test]
    fn test_keyword_application_position() {
        // map-set and define-map must not count as branch/loop constructs.
        let src = "(define-map m uint uint)\n(define-public (w)\n  (begin (map-set m u1 u2) (ok true)))";
        let flow = scan(src).unwrap().flow;
        assert_eq!(flow.branches.len(), 0);
        assert_eq!(flow.loops, 1);
        // A genuine map application does.
        let src = "(define-private (twice (xs (list 10 uint)))\n  (map double xs))";
        let flow = scan(src).unwrap().flow;
        assert_eq!(flow.branches.len(), 1);
        assert_eq!(flow.loops, 1);
    }

    #[test]
    fn test_branch_depth_tracks_open_loops() {
        let src = "(define-private (deep)\n  (begin\n    (fold check\n      (if (> u1 u0) (list u1) (list u2))\n      u0)))";
        let flow = scan(src).unwrap().flow;
        // The `if` sits under begin + fold.
        let if_branch = flow.branches.iter().find(|b| b.line == 4).unwrap();
        assert_eq!(if_branch.depth, 2);
    }

    #[test]
    fn test_transfer_call_recorded() {
        let src = "(define-public (payout (to principal))\n  (begin\n    (contract-call? .bank stx-transfer? u100 tx-sender to)\n    (ok true)))";
        let outcome = scan(src).unwrap();
        assert_eq!(outcome.flow.transfers.len(), 1);
        assert_eq!(outcome.flow.transfers[0].line, 3);
        assert!(outcome.context.call_targets.contains_key("bank"));
    }

    #[test]
    fn test_dynamic_call_detection() {
        let src = "(define-public (spread)\n  (begin\n    (contract-call? .registry get-contracts-owned tx-sender)\n    (ok true)))";
        assert_eq!(scan(src).unwrap().flow.dynamic, 1);
    }

    #[test]
    fn test_overflow_signal_for_both_operators() {
        // Untyped addition operand.
        let flow = scan("(define-private (f (x uint)) (+ x u1))").unwrap().flow;
        assert_eq!(flow.overflows, 1);
        // Untyped multiplication operand.
        let flow = scan("(define-private (f (x uint)) (* x u2))").unwrap().flow;
        assert_eq!(flow.overflows, 1);
        // Unsigned literals on both sides stay quiet.
        let flow = scan("(define-private (f) (+ u1 u2))").unwrap().flow;
        assert_eq!(flow.overflows, 0);
    }

    #[test]
    fn test_structural_imbalance() {
        assert!(matches!(
            scan("(define-public (broken)\n  (begin (ok u1)"),
            Err(ScanError::StructuralImbalance)
        ));
    }

    #[test]
    fn test_balanced_single_line_conditional_scans_clean() {
        let src = "(define-private (pick (x uint)) (if (> x u1) x u1))";
        assert!(scan(src).is_ok());
    }

    #[test]
    fn test_statement_after_stops_at_comment_marker() {
        let src = "(define-public (f)\n  (contract-call? .t ft-transfer? u1)\n  (ok u1)) ;; done\n(map-set m u1 u2)";
        let outcome = scan(src).unwrap();
        let tail = outcome.statement_after(2);
        assert!(tail.contains("(ok u1)"));
        assert!(!tail.contains("map-set"));
    }

    #[test]
    fn test_invocation_counting() {
        let src = "(define-private (helper (x uint))\n  (ok x))\n(define-public (run)\n  (helper u1))";
        let ctx = scan(src).unwrap().context;
        assert_eq!(ctx.funcs["helper"].invoked, 1);
        assert_eq!(ctx.funcs["run"].invoked, 0);
    }

    #[test]
    fn test_event_and_deploy_tallies() {
        let src = "(define-public (announce)\n  (begin\n    (print (launched u1))\n    (emit-event launched)\n    (deploy-contract child (ok u1))\n    (ok true)))";
        let outcome = scan(src).unwrap();
        assert_eq!(outcome.flow.event_emits, 2);
        assert_eq!(outcome.context.events["launched"], 2);
        assert_eq!(outcome.flow.contract_creates, 1);
        assert_eq!(outcome.context.deployed["child"], 1);
    }

    #[test]
    fn test_post_condition_counter() {
        let src = "(define-post-condition supply-stable)\n(define-public (f)\n  (ok u1))";
        assert_eq!(scan(src).unwrap().context.post_conditions, 1);
    }
}
