// Host-side tests for the latent exchange between the engine and the patch.

use mobrave_core::{LatentExchange, LATENTS_IN_TAG, LATENTS_OUT_TAG};

#[test]
fn only_latents_out_messages_are_stored() {
    let mut x = LatentExchange::new();
    assert!(!x.receive("bang", &[1.0]));
    assert!(!x.receive(LATENTS_IN_TAG, &[1.0]));
    assert!(x.current().is_empty());

    assert!(x.receive(LATENTS_OUT_TAG, &[0.5, -0.5]));
    assert_eq!(x.current(), &[0.5, -0.5]);

    // A newer message replaces the old one entirely.
    assert!(x.receive(LATENTS_OUT_TAG, &[0.1]));
    assert_eq!(x.current(), &[0.1]);
}

#[test]
fn merge_overwrites_leading_engine_latents() {
    let mut x = LatentExchange::new();
    x.receive(LATENTS_OUT_TAG, &[9.0, 8.0]);
    let mut engine = [1.0, 2.0, 3.0, 4.0];
    assert_eq!(x.merge_into(&mut engine), 2);
    assert_eq!(engine, [9.0, 8.0, 3.0, 4.0]);
}

#[test]
fn merge_truncates_to_engine_length() {
    let mut x = LatentExchange::new();
    x.receive(LATENTS_OUT_TAG, &[1.0, 2.0, 3.0]);
    let mut engine = [0.0; 2];
    assert_eq!(x.merge_into(&mut engine), 2);
    assert_eq!(engine, [1.0, 2.0]);
}

#[test]
fn merge_without_patch_values_leaves_engine_untouched() {
    let x = LatentExchange::new();
    let mut engine = [0.25; 8];
    assert_eq!(x.merge_into(&mut engine), 0);
    assert_eq!(engine, [0.25; 8]);
}
