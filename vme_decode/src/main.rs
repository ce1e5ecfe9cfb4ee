/*!
# mesytec VME Data Decoder

Reads data words from stdin until end of input and prints one decoded line
per word to stdout.

## Usage

```bash
echo "0x40010c07 0x10100868 0x1000036e 0xc18d01bd" | decode_mesytec_vme_data
```

```text
0x40010c07 module_header, module_id=0x01, module_setting=0x3, data_length=7 words
0x10100868 data_word, channel_address=16, mdpp_flags=0x0
0x1000036e data_word, channel_address= 0, mdpp_flags=0x0
0xc18d01bd end_of_event, low_stamp=26018237
```

Words may be given in hexadecimal (`0x` prefix), octal (leading `0`) or
decimal, any number per line. The tool can also be started on its own and
words pasted into the terminal; each line is decoded as soon as it is read.

Logging goes to stderr and is controlled with `RUST_LOG` (default `warn`).
*/

use clap::Parser;
use std::io;
use tracing_subscriber::EnvFilter;

mod pipeline;

#[derive(Parser)]
#[command(name = "decode_mesytec_vme_data")]
#[command(about = "Decode mesytec VME data words read from stdin")]
#[command(version)]
struct Cli {}

fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();

    // Log to stderr to keep stdout clean for decoded lines
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    pipeline::run(io::stdin(), io::stdout().lock())?;

    Ok(())
}
