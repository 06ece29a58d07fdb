use hematite_nn::{Network, TrainConfig, train_loop};

fn main() {
    let mut network = Network::new(2, 2, 1).expect("valid dimensions");

    let inputs = vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0, 0.0],
    ];
    let targets = vec![
        vec![1.0],
        vec![0.0],
        vec![1.0],
        vec![0.0],
    ];

    let mut config = TrainConfig::new(1000, 0.5);
    config.shuffle = false;

    for round in 0..10 {
        let loss = train_loop(&mut network, &inputs, &targets, &config)
            .expect("dataset is well-formed");
        println!("Epoch {}: mean loss = {loss:.6}", round * 1000);
    }

    for input in &inputs {
        let output = network.predict(input).expect("input length matches");
        println!("Input: {:?} -> Output: {:.4}", input, output[0]);
    }
}
