//! Interactive main menu and the shared send flow.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::info;

use biji_core::address::{Address, Network};
use biji_core::types::Hash256;
use biji_wallet::{BroadcastGateway, Destination, HistoryOracle, Wallet};

use crate::display;

const MENU: &str = "\
MAIN MENU
1. New key
2. Receive addresses
3. Show history and balance
4. Send funds
5. Import WIF key
6. Exit
";

/// Line-oriented prompts over any reader and writer.
pub struct Console<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    /// Print `label` and read one trimmed line. `None` at end of input.
    pub fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Yes/no question. An empty answer takes `default`; end of input is "no".
    pub fn confirm(&mut self, label: &str, default: bool) -> io::Result<bool> {
        Ok(match self.ask(label)? {
            None => false,
            Some(answer) => match answer.to_ascii_lowercase().as_str() {
                "" => default,
                "y" | "yes" => true,
                _ => false,
            },
        })
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.out)
    }
}

/// Select, build and sign a payment, show it, and broadcast once confirmed.
///
/// Returns `Ok(None)` when the user declines. Any failure of the send is an
/// error; nothing is kept from a failed or declined send.
pub fn send_payment<R: BufRead, W: Write>(
    wallet: &Wallet,
    oracle: &dyn HistoryOracle,
    gateway: &dyn BroadcastGateway,
    destinations: Vec<Destination>,
    change_address: Option<Address>,
    console: &mut Console<R, W>,
    assume_yes: bool,
) -> Result<Option<Hash256>> {
    let mut send = wallet.send();
    for destination in destinations {
        send.add_destination(destination)?;
    }
    if let Some(change) = change_address {
        change
            .require_network(wallet.network())
            .context("Change address is on the wrong network")?;
        send.set_change_address(change)?;
    }

    let signed = send.prepare(oracle)?;
    display::write_transaction(console.out(), signed, wallet.network())?;

    if !assume_yes && !console.confirm("Send transaction? [y/N] ", false)? {
        send.cancel()?;
        writeln!(console.out(), "Cancelled.")?;
        return Ok(None);
    }

    let txid = send.broadcast(gateway)?;
    writeln!(console.out(), "Broadcasted: {txid}")?;
    Ok(Some(txid))
}

/// The interactive loop.
pub struct Menu<'a, R, W> {
    wallet: &'a mut Wallet,
    oracle: &'a dyn HistoryOracle,
    gateway: &'a dyn BroadcastGateway,
    console: Console<R, W>,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(
        wallet: &'a mut Wallet,
        oracle: &'a dyn HistoryOracle,
        gateway: &'a dyn BroadcastGateway,
        console: Console<R, W>,
    ) -> Self {
        Self {
            wallet,
            oracle,
            gateway,
            console,
        }
    }

    /// Run until "Exit" or end of input.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.console.out(), "Running on {}", self.wallet.network())?;
        loop {
            let Some(choice) = self.console.ask(MENU)? else {
                break;
            };
            let outcome = match choice.as_str() {
                "1" => self.new_key(),
                "2" => self.list_addresses(),
                "3" => self.show_history(),
                "4" => self.send_funds(),
                "5" => self.import_key(),
                "6" | "q" | "quit" | "exit" => break,
                "" => Ok(()),
                other => {
                    writeln!(self.console.out(), "Unknown choice: {other}")?;
                    Ok(())
                }
            };
            // Any failure returns to the menu with its reason.
            if let Err(e) = outcome {
                writeln!(self.console.out(), "error: {e:#}")?;
            }
        }
        if self.wallet.has_unsaved_changes() {
            self.save()?;
        }
        Ok(())
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    fn save(&mut self) -> Result<()> {
        self.wallet.save().with_context(|| {
            format!(
                "Failed to save keys to {}",
                self.wallet.config().key_file.display()
            )
        })?;
        writeln!(
            self.console.out(),
            "Saved keys to {}",
            self.wallet.config().key_file.display()
        )?;
        Ok(())
    }

    fn new_key(&mut self) -> Result<()> {
        let address = self.wallet.new_key()?;
        info!(%address, "generated key");
        writeln!(self.console.out(), "{address}")?;
        self.save()
    }

    fn import_key(&mut self) -> Result<()> {
        let Some(wif) = self.console.ask("WIF key: ")? else {
            return Ok(());
        };
        let address = self.wallet.import_wif(&wif)?;
        writeln!(self.console.out(), "{address}")?;
        if self.wallet.has_unsaved_changes() {
            self.save()?;
        }
        Ok(())
    }

    fn list_addresses(&mut self) -> Result<()> {
        let addresses = self.wallet.addresses();
        if addresses.is_empty() {
            writeln!(self.console.out(), "No keys yet. Choose 1 to create one.")?;
        }
        for address in addresses {
            writeln!(self.console.out(), "{address}")?;
        }
        Ok(())
    }

    fn show_history(&mut self) -> Result<()> {
        let history = self.wallet.history(self.oracle)?;
        let balance = self.wallet.balance(&history);
        display::write_history(self.console.out(), &history)?;
        display::write_balance(self.console.out(), &balance)?;
        Ok(())
    }

    fn send_funds(&mut self) -> Result<()> {
        let Some(destinations) = self.collect_destinations(self.wallet.network())? else {
            return Ok(());
        };
        send_payment(
            self.wallet,
            self.oracle,
            self.gateway,
            destinations,
            None,
            &mut self.console,
            false,
        )?;
        Ok(())
    }

    /// Prompt for (address, amount) pairs. `None` if input ends first.
    fn collect_destinations(&mut self, network: Network) -> Result<Option<Vec<Destination>>> {
        let mut destinations = Vec::new();
        loop {
            let Some(address) = self.console.ask("Address: ")? else {
                return Ok(None);
            };
            let Some(amount) = self.console.ask("Amount: ")? else {
                return Ok(None);
            };
            match Destination::parse(&address, &amount, network) {
                Ok(destination) => destinations.push(destination),
                Err(e) => {
                    writeln!(self.console.out(), "error: {e}")?;
                    continue;
                }
            }
            if !self.console.confirm("Add another output? [Y/n] ", true)? {
                return Ok(Some(destinations));
            }
        }
    }
}
