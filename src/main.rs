use datatypes::prelude::*;

message! {
    BASIC_AMOUNT = "BasicAmountType" {
        content Text;
        scalar "currencyID": Text { attribute };
    }
    ERROR_TYPE = "ErrorType" {
        scalar "ShortMessage": Text;
        scalar "ErrorCode": Integer;
        scalar "SeverityCode": Text;
    }
    ABSTRACT_RESPONSE = "AbstractResponseType" {
        scalar "Timestamp": Text { namespace "ebl" };
        scalar "Ack": Text { namespace "ebl" };
        array "Errors": ERROR_TYPE { namespace "ebl" };
        scalar "version": Text { attribute };
    }
    BALANCE_RESPONSE = "GetBalanceResponseType" : ABSTRACT_RESPONSE {
        object "Balance": BASIC_AMOUNT { namespace "ebl" };
        array "BalanceHoldings": BASIC_AMOUNT { namespace "ebl" };
    }
}

fn check(ty: ObjectType, raw: &Raw) -> Result<()> {
    let obj = Object::from_raw(ty, raw)?;
    println!("{} <- {}", obj.type_name(), raw);
    println!("  to_hash: {}", obj.to_hash());
    println!("  plain:   {}", obj.to_representation(&ReprOptions::plain()));
    assert_eq!(Object::from_raw(ty, &obj.to_hash())?, obj);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    check(
        *BALANCE_RESPONSE,
        &raw_map! {
            "timestamp" => "2024-03-01T10:00:00Z",
            "ebl:Ack" => "Success",
            "@version" => "106.0",
            "Balance" => raw_map! { "@currencyID" => "USD", "value" => "12.50" },
            "balance_holdings" => raw_map! { "1" => "3.00" },
        },
    )?;

    check(
        *ABSTRACT_RESPONSE,
        &raw_map! {
            "Ack" => "Failure",
            "Errors" => raw_map! { "short_message" => "Bad input", "error_code" => "10004" },
        },
    )?;

    match Object::from_raw(*ERROR_TYPE, &raw_map! { "ErrorCode" => "ten" }) {
        Ok(obj) => println!("unexpectedly built {}", obj.to_hash()),
        Err(err) => println!("rejected: {err} (at {})", err.field_path().join(".")),
    }
    Ok(())
}
