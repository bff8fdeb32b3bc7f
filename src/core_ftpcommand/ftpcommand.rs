#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    QUIT,
    PWD,
    XPWD,
    LIST,
    NLST,
    CWD,
    CDUP,
    XCUP,
    NOOP,
    MKD,
    XMKD,
    RMD,
    XRMD,
    DELE,
    RNFR,
    RNTO,
    RETR,
    STOR,
    PORT,
    EPRT,
    PASV,
    EPSV,
    SITE,
    FEAT,
    HELP,
    ALLO,
    SYST,
    TYPE,
    SIZE,
    MDTM,
    MFMT,
    STAT,
    OPTS,
    UTF8,
    REIN,
}

impl FtpCommand {
    pub fn from_str(cmd: &str) -> Option<FtpCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "QUIT" => Some(FtpCommand::QUIT),
            "PWD" => Some(FtpCommand::PWD),
            "XPWD" => Some(FtpCommand::XPWD),
            "LIST" => Some(FtpCommand::LIST),
            "NLST" => Some(FtpCommand::NLST),
            "CWD" => Some(FtpCommand::CWD),
            "CDUP" => Some(FtpCommand::CDUP),
            "XCUP" => Some(FtpCommand::XCUP),
            "NOOP" => Some(FtpCommand::NOOP),
            "MKD" => Some(FtpCommand::MKD),
            "XMKD" => Some(FtpCommand::XMKD),
            "RMD" => Some(FtpCommand::RMD),
            "XRMD" => Some(FtpCommand::XRMD),
            "DELE" => Some(FtpCommand::DELE),
            "RNFR" => Some(FtpCommand::RNFR),
            "RNTO" => Some(FtpCommand::RNTO),
            "RETR" => Some(FtpCommand::RETR),
            "STOR" => Some(FtpCommand::STOR),
            "PORT" => Some(FtpCommand::PORT),
            "EPRT" => Some(FtpCommand::EPRT),
            "PASV" => Some(FtpCommand::PASV),
            "EPSV" => Some(FtpCommand::EPSV),
            "SITE" => Some(FtpCommand::SITE),
            "FEAT" => Some(FtpCommand::FEAT),
            "HELP" => Some(FtpCommand::HELP),
            "ALLO" => Some(FtpCommand::ALLO),
            "SYST" => Some(FtpCommand::SYST),
            "TYPE" => Some(FtpCommand::TYPE),
            "SIZE" => Some(FtpCommand::SIZE),
            "MDTM" => Some(FtpCommand::MDTM),
            "MFMT" => Some(FtpCommand::MFMT),
            "STAT" => Some(FtpCommand::STAT),
            "OPTS" => Some(FtpCommand::OPTS),
            "UTF8" => Some(FtpCommand::UTF8),
            "REIN" => Some(FtpCommand::REIN),
            _ => None,
        }
    }
}
