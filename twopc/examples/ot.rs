use std::net::TcpStream;

use crypto_core::{CommandLineOpt, NetChannel};
use rand::RngCore;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;
use twopc::ot::{BmReceiver, BmSender, OtGroup, OtReceiver, OtSender};

fn rand_bytes_vec(size: usize, len: usize) -> Vec<Vec<u8>> {
    (0..size)
        .map(|_| {
            let mut m = vec![0u8; len];
            rand::thread_rng().fill_bytes(&mut m);
            m
        })
        .collect()
}

fn rand_bool_vec(size: usize) -> Vec<bool> {
    (0..size).map(|_| rand::random::<bool>()).collect()
}

fn bm_ot_test(netio: &mut NetChannel<TcpStream, TcpStream>) -> anyhow::Result<()> {
    let mut rng = rand::thread_rng();
    if netio.is_server() {
        let m: Vec<(Vec<u8>, Vec<u8>)> = rand_bytes_vec(8, 16)
            .into_iter()
            .zip(rand_bytes_vec(8, 16))
            .collect();
        let group = OtGroup::generate(&mut rng, 128);
        let mut ot = BmSender::new(group);
        ot.send(netio, &m, &mut rng)?;
        for (i, (m0, m1)) in m.iter().enumerate() {
            println!("send {}: {} {}", i, hex::encode(m0), hex::encode(m1));
        }
    } else {
        let select = rand_bool_vec(8);
        let mut ot = BmReceiver::new();
        let result = ot.receive(netio, &select, &mut rng)?;
        println!("select bits: {:?}", select);
        for (i, m) in result.iter().enumerate() {
            println!("received {}: {}", i, hex::encode(m));
        }
    }
    let (read, written, flushes) = netio.stats();
    println!("read {} bytes, wrote {} bytes, {} flushes", read, written, flushes);
    Ok(())
}

// run the main function in two terminals
// cargo run --example ot -- --is-server 1
// cargo run --example ot -- --is-server 0
pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let opt = CommandLineOpt::from_args();
    let is_server = opt.is_server > 0;
    let mut netio = NetChannel::new(is_server, opt.addr.as_str(), opt.read_timeout())?;
    bm_ot_test(&mut netio)
}
