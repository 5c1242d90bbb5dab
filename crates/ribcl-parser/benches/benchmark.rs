use ribcl_parser::{Node, Parser};

fn main() {
    divan::main();
}

const EMBEDDED_HEALTH: &str = include_str!("../tests/fixtures/embedded_health.xml");

fn concatenated(n: usize) -> String {
    EMBEDDED_HEALTH.repeat(n)
}

#[divan::bench(args = [1, 10, 100])]
fn parse_response(bencher: divan::Bencher, n: usize) {
    let response = concatenated(n);
    let parser = Parser::default();
    bencher.bench(|| parser.parse_response(divan::black_box(&response)));
}

#[divan::bench(name = "find_all_descendant")]
fn find_all_descendant(bencher: divan::Bencher) {
    let roots: Vec<Node> = Parser::default().parse_response(&concatenated(10));
    bencher.bench(|| {
        roots
            .iter()
            .map(|root| root.find_all(divan::black_box(".//PHYSICAL_DRIVE")).len())
            .sum::<usize>()
    });
}

#[divan::bench(name = "find_chain")]
fn find_chain(bencher: divan::Bencher) {
    let roots: Vec<Node> = Parser::default().parse_response(EMBEDDED_HEALTH);
    bencher.bench(|| {
        roots[1].find(divan::black_box(
            "GET_EMBEDDED_HEALTH_DATA/STORAGE/CONTROLLER/LOGICAL_DRIVE/PHYSICAL_DRIVE",
        ))
        .is_some()
    });
}
