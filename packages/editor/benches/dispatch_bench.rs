use criterion::{black_box, criterion_group, criterion_main, Criterion};
use funnel_document::{IdGenerator, TemplateCatalog};
use funnel_editor::EditorStore;
use serde_json::json;

fn store_with_pages(count: usize) -> EditorStore {
    let catalog = TemplateCatalog::builtin();
    let mut store = EditorStore::new();
    for template in catalog.iter().cycle().take(count) {
        store.add_page_from_template(template).unwrap();
    }
    store
}

fn first_heading_id(store: &EditorStore) -> String {
    store
        .active_page()
        .and_then(|page| page.canvas_root.find_first(funnel_document::NodeType::Heading))
        .map(|node| node.id.clone())
        .unwrap()
}

fn update_node_props(c: &mut Criterion) {
    let mut props = serde_json::Map::new();
    props.insert("headline".to_string(), json!("Benchmark"));

    c.bench_function("update_node_props_20_pages", |b| {
        let mut store = store_with_pages(20);
        let page_id = store.pages()[1].id.clone();
        store.set_active_page(&page_id).unwrap();
        let heading = first_heading_id(&store);

        b.iter(|| {
            store
                .update_node_props(black_box(&heading), props.clone())
                .unwrap();
            store.undo();
        })
    });
}

fn add_page_from_template(c: &mut Criterion) {
    let catalog = TemplateCatalog::builtin();
    let template = catalog.get("question-options").unwrap().clone();

    c.bench_function("add_page_from_template", |b| {
        b.iter(|| {
            let mut store = EditorStore::with_id_generator(
                funnel_document::default_document(&mut IdGenerator::from_seed("bench")),
                IdGenerator::from_seed("store"),
                100,
            );
            store.add_page_from_template(black_box(&template)).unwrap();
        })
    });
}

fn extract_document(c: &mut Criterion) {
    let store = store_with_pages(50);

    c.bench_function("extract_document_50_pages", |b| {
        b.iter(|| black_box(store.extract_document()))
    });
}

criterion_group!(
    benches,
    update_node_props,
    add_page_from_template,
    extract_document
);
criterion_main!(benches);
