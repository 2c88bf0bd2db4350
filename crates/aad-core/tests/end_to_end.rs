//! End-to-end scenarios against the full dictionary API, running in
//! simulate mode so no trusted setup is required.

use aad_core::aad::Aad;
use aad_core::membership::{self};
use aad_core::params::CryptoContext;

const LAMBDA: usize = 128;

#[test]
fn a_fresh_dictionary_has_an_empty_digest() {
    let aad = Aad::new_simulated(LAMBDA);
    let digest = aad.get_digest(None).expect("current digest always exists");
    assert_eq!(digest.entries.len(), 0);
}

#[test]
fn appending_one_key_produces_a_single_tree_digest() {
    let mut aad = Aad::new_simulated(LAMBDA);
    aad.append(b"alice", b"payment-1").expect("append succeeds");
    let digest = aad.get_digest(None).expect("current digest always exists");
    assert_eq!(digest.entries.len(), 1);
}

#[test]
fn two_appends_merge_into_one_size_two_tree() {
    let mut aad = Aad::new_simulated(LAMBDA);
    aad.append(b"alice", b"payment-1").expect("append succeeds");
    aad.append(b"bob", b"payment-2").expect("append succeeds");
    let digest = aad.get_digest(None).expect("current digest always exists");
    assert_eq!(digest.entries.len(), 1);
}

#[test]
fn three_appends_leave_a_size_two_and_a_size_one_tree() {
    let mut aad = Aad::new_simulated(LAMBDA);
    aad.append(b"alice", b"1").expect("append succeeds");
    aad.append(b"bob", b"2").expect("append succeeds");
    aad.append(b"carol", b"3").expect("append succeeds");
    let digest = aad.get_digest(None).expect("current digest always exists");
    assert_eq!(digest.entries.len(), 2);
}

#[test]
fn a_key_can_be_appended_more_than_once() {
    let mut aad = Aad::new_simulated(LAMBDA);
    aad.append(b"alice", b"first").expect("append succeeds");
    aad.append(b"alice", b"second").expect("append succeeds");
    let values = aad.get_values(b"alice");
    assert_eq!(values.len(), 2);
    assert_eq!(values[0].0, b"first");
    assert_eq!(values[1].0, b"second");
}

#[test]
fn membership_proof_verifies_for_a_present_key() {
    let mut aad = Aad::new_simulated(LAMBDA);
    aad.append(b"alice", b"payment-1").expect("append succeeds");
    aad.append(b"bob", b"payment-2").expect("append succeeds");

    let proofs = aad.complete_membership_proof(b"alice").expect("alice was appended");
    let digest = aad.get_digest(None).expect("current digest always exists");

    for (tree_idx, proof) in &proofs {
        let entry = &digest.entries[*tree_idx];
        assert!(membership::verify_membership_proof(
            proof,
            entry.acc_at,
            entry.acc_frontier,
            entry.bezout_x,
            entry.bezout_y,
            b"alice",
            LAMBDA,
            &CryptoContext::Simulated,
        ));
    }
}

#[test]
fn membership_proof_for_a_key_with_two_values_lists_both() {
    let mut aad = Aad::new_simulated(LAMBDA);
    aad.append(b"alice", b"first").expect("append succeeds");
    aad.append(b"alice", b"second").expect("append succeeds");

    let proofs = aad.complete_membership_proof(b"alice").expect("alice was appended");
    let present_values: usize = proofs
        .iter()
        .map(|(_, proof)| match proof {
            membership::MembershipProof::Present { values, .. } => values.len(),
            membership::MembershipProof::Absent { .. } => 0,
        })
        .sum();
    assert_eq!(present_values, 2);
}

#[test]
fn append_only_proof_covers_every_tree_in_an_earlier_digest() {
    let mut aad = Aad::new_simulated(LAMBDA);
    aad.append(b"alice", b"1").expect("append succeeds");
    let v1 = aad.version();
    aad.append(b"bob", b"2").expect("append succeeds");
    aad.append(b"carol", b"3").expect("append succeeds");

    let proofs = aad.append_only_proof(v1).expect("v1 is a valid earlier version");
    let old_digest = aad.get_digest(Some(v1)).expect("v1 is a valid earlier version").clone();
    assert_eq!(proofs.len(), old_digest.entries.len());
}

#[test]
fn get_key_by_leaf_no_recovers_append_order() {
    let mut aad = Aad::new_simulated(LAMBDA);
    aad.append(b"alice", b"1").expect("append succeeds");
    aad.append(b"bob", b"2").expect("append succeeds");
    assert_eq!(aad.get_key_by_leaf_no(0), Some(b"alice".as_slice()));
    assert_eq!(aad.get_key_by_leaf_no(1), Some(b"bob".as_slice()));
    assert_eq!(aad.get_key_by_leaf_no(2), None);
}
