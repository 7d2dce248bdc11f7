//! Fuzz target for SetHash decoding and accumulation
//!
//! # Strategy
//!
//! - Arbitrary strings fed to `from_hex`
//! - Random add/remove sequences, replayed in reverse order
//!
//! # Invariants
//!
//! - `from_hex` never panics; accepted input re-encodes to itself
//! - Order of operations does not change the digest
//! - Removing everything that was added yields the empty digest

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sse_crypto::SetHash;

#[derive(Debug, Clone, Arbitrary)]
enum SetOperation {
    Add(Vec<u8>),
    Remove(Vec<u8>),
}

#[derive(Debug, Clone, Arbitrary)]
struct SetHashScenario {
    encoded: String,
    operations: Vec<SetOperation>,
}

fn apply(hash: &mut SetHash, op: &SetOperation) {
    match op {
        SetOperation::Add(value) => hash.add_element(value),
        SetOperation::Remove(value) => hash.remove_element(value),
    }
}

fn undo(hash: &mut SetHash, op: &SetOperation) {
    match op {
        SetOperation::Add(value) => hash.remove_element(value),
        SetOperation::Remove(value) => hash.add_element(value),
    }
}

fuzz_target!(|scenario: SetHashScenario| {
    // INVARIANT 1: Decoding is canonical
    if let Ok(decoded) = SetHash::from_hex(&scenario.encoded) {
        assert_eq!(decoded.to_hex(), scenario.encoded);
    }

    let mut forward = SetHash::new();
    for op in &scenario.operations {
        apply(&mut forward, op);
    }

    // INVARIANT 2: Reverse order reaches the same digest
    let mut backward = SetHash::new();
    for op in scenario.operations.iter().rev() {
        apply(&mut backward, op);
    }
    assert_eq!(forward, backward);

    // INVARIANT 3: Serialization roundtrip
    assert_eq!(SetHash::from_hex(&forward.to_hex()).unwrap(), forward);

    // INVARIANT 4: Undoing every operation empties the digest
    for op in &scenario.operations {
        undo(&mut forward, op);
    }
    assert!(forward.is_empty());
});
