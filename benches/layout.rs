use criterion::{black_box, criterion_group, criterion_main, Criterion};

use opera_face::{
    landmarks::{LandmarkFrame, Surface},
    render::{LayoutEngine, RasterCanvas, RecordingSink, RenderOptions},
};

fn bench_layout(c: &mut Criterion) {
    let frame = LandmarkFrame::neutral_face();
    let options = RenderOptions { color_adaptation: true, ..Default::default() };
    let surface = Surface::new(640, 480);

    let mut engine = LayoutEngine::with_builtin_catalog();
    c.bench_function("layout guanyu (warm cache)", |b| {
        b.iter(|| engine.layout_style(black_box("guanyu"), &frame, surface, &options))
    });

    let mut engine = LayoutEngine::with_builtin_catalog();
    c.bench_function("layout guanyu (cold cache)", |b| {
        b.iter(|| {
            engine.clear_cache();
            engine.layout_style(black_box("guanyu"), &frame, surface, &options)
        })
    });

    let mut engine = LayoutEngine::with_builtin_catalog();
    c.bench_function("render jing to recording sink", |b| {
        b.iter(|| {
            let mut sink = RecordingSink::new(640, 480);
            engine.render(&frame, black_box("jing"), &options, &mut sink)
        })
    });
}

fn bench_raster(c: &mut Criterion) {
    let frame = LandmarkFrame::neutral_face();
    let options = RenderOptions::default();
    let mut engine = LayoutEngine::with_builtin_catalog();

    c.bench_function("rasterize chou 640x480", |b| {
        b.iter(|| {
            let mut canvas = RasterCanvas::new(640, 480);
            engine.render(&frame, black_box("chou"), &options, &mut canvas);
            canvas
        })
    });
}

criterion_group!(benches, bench_layout, bench_raster);
criterion_main!(benches);
