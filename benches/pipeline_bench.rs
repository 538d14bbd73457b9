//! Benchmarks for the model build, merge and deck export pipeline

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fea_bridge::prelude::*;

fn create_beam_part(name: &str, segments: u32) -> UnifiedFemModel {
    let mut model = UnifiedFemModel::new(name);
    for i in 1..=segments + 1 {
        model
            .add_node(Node::new(i, 0.5 * f64::from(i - 1), 0.0, 0.0))
            .unwrap();
    }
    for i in 1..=segments {
        model
            .add_element(Element::new(i, ElementType::B31, vec![i, i + 1]))
            .unwrap();
    }
    model.add_set(FemSet::nodes("support", vec![1])).unwrap();
    model
        .add_set(FemSet::elements("beams", (1..=segments).collect()))
        .unwrap();
    model.add_material(Material::steel("S355")).unwrap();
    model
        .add_section(Section::beam(
            "beam_section",
            "beams",
            "S355",
            SectionProfile::rectangular(0.1, 0.1),
        ))
        .unwrap();
    model
        .add_boundary_condition(BoundaryCondition::fixed("clamp", "support"))
        .unwrap();
    model
}

fn create_assembly(parts: usize, segments: u32) -> UnifiedFemModel {
    let mut merged = merge_models(
        "assembly",
        (0..parts).map(|i| create_beam_part(&format!("part_{}", i), segments)),
    )
    .unwrap();
    merged.add_step(Step::eigenfrequency("modes", 10)).unwrap();
    merged
}

fn benchmark_model_build(c: &mut Criterion) {
    c.bench_function("build_beam_1000_elements", |b| {
        b.iter(|| black_box(create_beam_part("beam", 1000)))
    });
}

fn benchmark_merge(c: &mut Criterion) {
    c.bench_function("merge_10_parts_100_elements", |b| {
        b.iter(|| black_box(create_assembly(10, 100)))
    });
}

fn benchmark_deck_write(c: &mut Criterion) {
    let model = create_assembly(10, 100);
    c.bench_function("calculix_deck_1000_elements", |b| {
        b.iter(|| black_box(Dialect::CalculiX.deck_string(&model).unwrap()))
    });
    c.bench_function("sesam_deck_1000_elements", |b| {
        b.iter(|| black_box(Dialect::Sesam.deck_string(&model).unwrap()))
    });
}

criterion_group!(
    benches,
    benchmark_model_build,
    benchmark_merge,
    benchmark_deck_write
);
criterion_main!(benches);
