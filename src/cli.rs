use crate::errors::{EngineError, EngineResult};
use crate::models::GreeksModel;
use crate::report;
use crate::state::{GreeksResult, OptionParameters};
use std::io::{BufRead, Write};

/// Interactive prompt: collect the six parameters, evaluate once, print the
/// result lines. Unparseable numbers re-ask the same field; a rejected
/// parameter set prints the reason and starts over. End of input is an error.
pub fn run_prompt<R: BufRead, W: Write>(
    model: &dyn GreeksModel,
    input: &mut R,
    out: &mut W,
) -> EngineResult<GreeksResult> {
    writeln!(out, "Welcome to the Options Greeks Calculator!")?;

    loop {
        let spot = prompt_number(input, out, "Enter stock price (S): ")?;
        let strike = prompt_number(input, out, "Enter strike price (K): ")?;
        let expiry = prompt_number(input, out, "Enter time to expiration (years): ")?;
        let rate = prompt_number(
            input,
            out,
            "Enter risk-free rate (as decimal, e.g., 0.05 for 5%): ",
        )?;
        let sigma = prompt_number(
            input,
            out,
            "Enter volatility (as decimal, e.g., 0.2 for 20%): ",
        )?;
        let kind_raw = prompt_line(input, out, "Enter option type (call/put): ")?;

        let evaluated = OptionParameters::from_input(spot, strike, expiry, rate, sigma, &kind_raw)
            .and_then(|params| model.evaluate(&params));

        match evaluated {
            Ok(greeks) => {
                writeln!(out, "\nOption Greeks:")?;
                write!(out, "{}", report::render_plain(&greeks))?;
                return Ok(greeks);
            }
            Err(e) => {
                tracing::warn!(error = %e, "prompt parameters rejected");
                writeln!(out, "Invalid parameters: {e}. Please re-enter.\n")?;
            }
        }
    }
}

fn prompt_line<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> EngineResult<String> {
    write!(out, "{prompt}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(EngineError::Io("input closed".into()));
    }
    Ok(line.trim().to_string())
}

fn prompt_number<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> EngineResult<f64> {
    loop {
        let raw = prompt_line(input, out, prompt)?;
        match raw.parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => writeln!(out, "Not a number: {raw:?}")?,
        }
    }
}
