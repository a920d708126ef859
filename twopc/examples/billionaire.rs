//! Yao's millionaires' problem between two processes: who has less?

use std::net::TcpStream;

use circuit::{
    modules::{self, int_to_bits},
    Circuit,
};
use crypto_core::{CommandLineOpt, NetChannel};
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::EnvFilter;
use twopc::{Agent, GarbledCircuitProtocol, GcConfig, OtGroup};

const NBITS: usize = 64;

#[derive(StructOpt, Debug)]
struct Opt {
    #[structopt(flatten)]
    net: CommandLineOpt,

    /// This party's wealth.
    #[structopt(short, long)]
    value: u64,

    /// Garbling parameters as JSON, e.g. `{"security_param": 80}`.
    #[structopt(short, long, default_value = "{}")]
    config: String,
}

fn less_than() -> anyhow::Result<Circuit> {
    let mut circ = Circuit::new();
    let x = circ.register_wires(NBITS);
    let y = circ.register_wires(NBITS);
    let lt = modules::less_than(&mut circ, &x, &y)?;
    circ.set_inputs([x, y].concat())?;
    circ.set_outputs(vec![lt])?;
    Ok(circ)
}

fn billionaire(
    netio: NetChannel<TcpStream, TcpStream>,
    value: u64,
    config: GcConfig,
) -> anyhow::Result<bool> {
    let mut rng = rand::thread_rng();
    let is_alice = netio.is_server();
    let name = if is_alice { "alice" } else { "bob" };
    let mut agent = Agent::new(name, netio);

    // Alice picks the OT group and announces it first.
    let group = if is_alice {
        let group = OtGroup::generate(&mut rng, config.security_param);
        group.write(&mut agent.channel)?;
        group
    } else {
        OtGroup::read(&mut agent.channel, &mut rng)?
    };

    let protocol = GarbledCircuitProtocol::with_ot_group(
        less_than()?,
        NBITS,
        NBITS,
        "alice",
        "bob",
        config,
        group,
    )?;
    let input = int_to_bits(value as u128, NBITS);
    let outputs = if is_alice {
        protocol.alice(&mut agent, &input, &mut rng)?
    } else {
        protocol.bob(&mut agent, &input, &mut rng)?
    };

    let (read, written, flushes) = agent.channel.stats();
    info!(read, written, flushes, "protocol finished");
    Ok(outputs[0])
}

// run the main function in two terminals
// cargo run --example billionaire -- --is-server 1 --value 1000000
// cargo run --example billionaire -- --is-server 0 --value 2000000
pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let opt = Opt::from_args();
    let config: GcConfig = serde_json::from_str(&opt.config)?;
    config.validate()?;

    let is_server = opt.net.is_server > 0;
    let netio = NetChannel::new(is_server, opt.net.addr.as_str(), opt.net.read_timeout())?;
    let alice_is_poorer = billionaire(netio, opt.value, config)?;

    println!("=============================");
    println!("Yao's millionaires' problem with 2PC\n");
    println!("Your value: {}", opt.value);
    if alice_is_poorer {
        println!("Alice (server) is less wealthy than Bob (client)");
    } else {
        println!("Alice (server) is at least as wealthy as Bob (client)");
    }
    Ok(())
}
