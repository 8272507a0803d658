use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use mc_entity_types::{
    AncestryIndex, Catalog, KindDef, NullSink, ProtocolRegistry, ProtocolVersion, TypeResolver,
    VersionDefinition,
};

const V1: ProtocolVersion = ProtocolVersion::new(1);
const V2: ProtocolVersion = ProtocolVersion::new(2);

/// A wide three-level tree: ENTITY -> 16 groups -> 8 leaves each.
fn defs(shift: i32) -> Vec<KindDef> {
    let mut defs = vec![KindDef::root("ENTITY", -1)];
    for g in 0..16 {
        let group = format!("GROUP_{g}");
        defs.push(KindDef::owned(group.clone(), -1, Some("ENTITY")));
        for l in 0..8 {
            defs.push(KindDef::owned(
                format!("LEAF_{g}_{l}"),
                g * 8 + l + shift,
                Some(group.as_str()),
            ));
        }
    }
    defs
}

fn catalog(version: ProtocolVersion, shift: i32) -> Catalog {
    Catalog::builder(version)
        .fallback("ENTITY")
        .kinds(defs(shift))
        .build()
        .unwrap()
}

fn bench_resolve(c: &mut Criterion) {
    let resolver = TypeResolver::new(Arc::new(catalog(V1, 0)), Arc::new(NullSink));

    c.bench_function("resolve_known", |b| {
        b.iter(|| resolver.resolve(black_box(77)).unwrap());
    });

    c.bench_function("resolve_unknown", |b| {
        b.iter(|| resolver.resolve(black_box(10_000)).unwrap());
    });
}

fn bench_ancestry(c: &mut Criterion) {
    let catalog = catalog(V1, 0);
    let index = AncestryIndex::build(&catalog);
    let leaf = catalog.lookup_by_id(77).unwrap().id();
    let group = catalog.lookup_by_name("GROUP_9").unwrap().id();
    let root = catalog.lookup_by_name("ENTITY").unwrap().id();

    c.bench_function("is_descendant_of", |b| {
        b.iter(|| index.is_descendant_of(black_box(leaf), black_box(group)));
    });

    c.bench_function("nearest_known_ancestor", |b| {
        let kind = catalog.kind(leaf);
        b.iter(|| index.nearest_known_ancestor(kind, black_box(&[root])).unwrap());
    });
}

fn bench_translate(c: &mut Criterion) {
    let registry = ProtocolRegistry::new(Arc::new(NullSink));
    for (version, shift) in [(V1, 0), (V2, 3)] {
        registry
            .register(&VersionDefinition {
                version,
                name: format!("bench-{}", version.get()).into(),
                fallback: Some("ENTITY".into()),
                kinds: defs(shift).into(),
            })
            .unwrap();
    }

    c.bench_function("snapshot_resolve_translate", |b| {
        b.iter(|| {
            let snap = registry.snapshot();
            let kind = snap.resolve(V1, black_box(42)).unwrap();
            snap.translate(kind, V1, V2).unwrap().wire_id()
        });
    });
}

criterion_group!(benches, bench_resolve, bench_ancestry, bench_translate);
criterion_main!(benches);
