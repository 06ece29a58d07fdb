use hematite_nn::{Network, train_epoch};

fn main() {
    let mut network = Network::new(2, 3, 1).expect("valid dimensions");

    let inputs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let targets = vec![vec![0.0], vec![1.0], vec![1.0], vec![1.0]];

    for _ in 0..500 {
        train_epoch(&mut network, &inputs, &targets, 0.5).expect("dataset is well-formed");
    }

    let path = std::env::temp_dir().join("hematite_or.model");
    let path = path.to_str().expect("temp path is valid UTF-8");

    network.save_file(path).expect("model file is writable");
    let restored = Network::load_file(path).expect("model file reads back");
    assert_eq!(restored, network);
    println!("Round trip OK: {path}");

    for input in &inputs {
        let out = restored.predict(input).expect("input length matches");
        println!("Input: {:?} -> Output: {:.4}", input, out[0]);
    }
}
