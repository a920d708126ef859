use num_bigint::BigUint;
use structopt::StructOpt;

use crypto_core::{AbstractChannel, CommandLineOpt, Key, NetChannel};
use rand::random;

fn net_channel_test<C: AbstractChannel>(netio: &mut C, is_server: bool) -> std::io::Result<()> {
    let mut rng = rand::thread_rng();
    if is_server {
        let send_bytes = random::<[u8; 10]>();
        let send_bool = random::<bool>();
        let send_bools = random::<[bool; 10]>();
        let send_key = Key::random(&mut rng, 128);
        let send_int = BigUint::from(random::<u128>());

        println!("send_bytes: {}", hex::encode(send_bytes));
        println!("send_bool: {:?}", send_bool);
        println!("send_bools: {:?}", send_bools);
        println!("send_key: {}", hex::encode(send_key.as_bytes()));
        println!("send_int: {}", send_int);

        netio.write_bytes(&send_bytes)?;
        netio.write_bool(send_bool)?;
        netio.write_bools(&send_bools)?;
        netio.write_key(&send_key)?;
        netio.write_biguint(&send_int)?;
        netio.flush()?;
    } else {
        let mut recv_bytes = [0u8; 10];
        netio.read_bytes(&mut recv_bytes)?;
        let recv_bool = netio.read_bool()?;
        let recv_bools = netio.read_bools(10)?;
        let recv_key = netio.read_key(128)?;
        let recv_int = netio.read_biguint()?;

        println!("recv_bytes: {}", hex::encode(recv_bytes));
        println!("recv_bool: {:?}", recv_bool);
        println!("recv_bools: {:?}", recv_bools);
        println!("recv_key: {}", hex::encode(recv_key.as_bytes()));
        println!("recv_int: {}", recv_int);
    }
    Ok(())
}

// run the main function in two terminals
// cargo run --example netio -- --is-server 1
// cargo run --example netio -- --is-server 0
pub fn main() -> std::io::Result<()> {
    let opt = CommandLineOpt::from_args();
    let is_server = opt.is_server > 0;
    let mut netio = NetChannel::new(is_server, opt.addr.as_str(), opt.read_timeout())?;
    net_channel_test(&mut netio, is_server)
}
