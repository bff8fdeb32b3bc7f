use crate::core_ftpcommand::CommandContext;
use crate::session::Session;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

pub async fn handle_help_command(
    _writer: Arc<Mutex<TcpStream>>,
    _ctx: Arc<CommandContext>,
    _session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<String, std::io::Error> {
    Ok(concat!(
        "214-Recognized commands:\r\n",
        "    ALLO  CWD   CDUP  DELE  EPRT  EPSV  FEAT  HELP  OPTS\r\n",
        "    LIST  MDTM  MFMT  MKD   NLST  NOOP  PASS\r\n",
        "    PASV  PORT  PWD   QUIT  REIN  RETR  RNFR  RNTO\r\n",
        "    RMD   SITE  SIZE  STAT  STOR  SYST  TYPE\r\n",
        "    UTF8  USER  XCUP  XMKD  XPWD  XRMD\r\n",
        "214 end"
    )
    .to_string())
}
