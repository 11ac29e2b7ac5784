use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use parlance::core::message::{Message, MessageId, Role};
use parlance::render::{render_markdown, to_markdown};
use parlance::ui::renderer::render_message;
use parlance::ui::syntax::PlainHighlighter;
use parlance::ui::theme::Theme;

fn make_reply(sections: usize) -> String {
    let mut reply = String::new();
    for i in 0..sections {
        reply.push_str(&format!("## Section {i}\n"));
        reply.push_str("Some *emphasis*, some **strong** words and a `snippet` inline.\n");
        reply.push_str("- first point\n- second point with **bold**\n\n");
        reply.push_str("1. step one\n2. step two\n");
        reply.push_str("```rust\nfn main() {\n    println!(\"**not bold**\");\n}\n```\n");
    }
    reply
}

fn bench_render_pipeline(c: &mut Criterion) {
    for &sections in &[10usize, 100usize] {
        let reply = make_reply(sections);
        let blocks = render_markdown(&reply);

        let mut group = c.benchmark_group(format!("render_pipeline_sections{}", sections));
        group.throughput(Throughput::Bytes(reply.len() as u64));

        group.bench_function(BenchmarkId::new("render_markdown", sections), |b| {
            b.iter(|| render_markdown(&reply))
        });
        group.bench_function(BenchmarkId::new("to_markdown", sections), |b| {
            b.iter(|| to_markdown(&blocks))
        });

        // Full message to terminal lines, without syntax highlighting
        let message = Message::new(MessageId(1), Role::Assistant, reply.clone());
        let theme = Theme::dark_default();
        group.bench_function(BenchmarkId::new("render_message", sections), |b| {
            b.iter(|| render_message(&message, &theme, &PlainHighlighter, true))
        });

        group.finish();
    }
}

criterion_group!(benches, bench_render_pipeline);
criterion_main!(benches);
