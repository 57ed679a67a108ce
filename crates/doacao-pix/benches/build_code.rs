// SPDX-License-Identifier: Apache-2.0

use criterion::{criterion_group, criterion_main, Criterion};
use doacao_model::{Amount, TxId};
use doacao_pix::{build, render_qr_data_uri};

fn bench_build_code(c: &mut Criterion) {
    let amount = Amount::from_cents(2500).expect("amount");
    let txid = TxId::from_bytes([0xAB; 16]);

    c.bench_function("pix.build.reference", |b| {
        b.iter(|| {
            build(
                "mateus@doacoes.org",
                "Doação para o Mateus",
                "Campanha do Mateus",
                "São Paulo",
                amount,
                &txid,
            )
        });
    });

    let code = build("k", "d", "N", "C", amount, &txid).expect("code");
    c.bench_function("pix.qr.render_svg", |b| b.iter(|| render_qr_data_uri(&code)));
}

criterion_group!(benches, bench_build_code);
criterion_main!(benches);
